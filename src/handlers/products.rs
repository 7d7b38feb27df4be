use crate::{
    errors::ServiceError,
    handlers::common::{created_response, success_response},
    services::product_service::RegisterProduct,
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};
use serde_json::json;

/// List all products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = state.services.products.list_products().await?;
    Ok(success_response(products))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state.services.products.get_product(product_id).await?;
    Ok(success_response(product))
}

/// Register a new product, optionally with its initial stock
pub async fn register_product(
    State(state): State<AppState>,
    Json(payload): Json<RegisterProduct>,
) -> Result<impl IntoResponse, ServiceError> {
    let registered = state.services.products.register_product(payload).await?;

    Ok(created_response(json!({
        "message": "Product registered successfully",
        "product": registered.product,
        "inventory": registered.inventory,
    })))
}
