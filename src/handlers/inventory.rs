use crate::{
    errors::ServiceError,
    handlers::common::{created_response, resolve_pagination, success_response, PaginationParams},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateInventoryRequest {
    pub product_id: i32,
    pub stock: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInventoryRequest {
    pub product_id: i32,
    pub stock: i32,
}

#[derive(Debug, Deserialize)]
pub struct LowStockParams {
    pub threshold: Option<i32>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// List inventory rows
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let pagination = params.resolve(&state.config)?;
    let items = state.services.inventory.list_inventory(pagination).await?;
    Ok(success_response(items))
}

/// Create the inventory row of a product
pub async fn create_inventory(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state
        .services
        .inventory
        .create_inventory(payload.product_id, payload.stock)
        .await?;
    Ok(created_response(item))
}

/// Inventory rows with stock below the threshold
pub async fn get_low_stock_items(
    State(state): State<AppState>,
    Query(params): Query<LowStockParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let pagination = resolve_pagination(params.skip, params.limit, &state.config)?;
    let items = state
        .services
        .inventory
        .low_stock(params.threshold, pagination)
        .await?;
    Ok(success_response(items))
}

/// Set the stock of a product and record the change
pub async fn update_inventory(
    State(state): State<AppState>,
    Json(payload): Json<UpdateInventoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state
        .services
        .inventory
        .update_inventory(payload.product_id, payload.stock)
        .await?;
    Ok(success_response(item))
}

/// Stock change history of a product, newest first
pub async fn get_inventory_history(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let pagination = params.resolve(&state.config)?;
    let history = state
        .services
        .inventory
        .history(product_id, pagination)
        .await?;
    Ok(success_response(history))
}
