use crate::{
    errors::ServiceError,
    filters::{DateRange, Period},
    handlers::common::{created_response, resolve_pagination, sales_filter, success_response},
    services::sales::RecordSale,
    AppState,
};
use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ListSalesParams {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub product_id: Option<i32>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RevenueParams {
    pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRevenueParams {
    pub start_date_1: DateTime<Utc>,
    pub end_date_1: DateTime<Utc>,
    pub start_date_2: DateTime<Utc>,
    pub end_date_2: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub period: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub product_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BestSellersParams {
    pub top_n: Option<u64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

/// List sales matching the optional filters
pub async fn list_sales(
    State(state): State<AppState>,
    Query(params): Query<ListSalesParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let pagination = resolve_pagination(params.skip, params.limit, &state.config)?;
    let filter = sales_filter(
        params.start_date,
        params.end_date,
        params.category,
        params.product_id,
    );
    let sales = state.services.reports.list_sales(filter, pagination).await?;
    Ok(success_response(sales))
}

/// Record a sale
pub async fn record_sale(
    State(state): State<AppState>,
    Json(payload): Json<RecordSale>,
) -> Result<impl IntoResponse, ServiceError> {
    let sale = state.services.sales.record_sale(payload).await?;
    Ok(created_response(sale))
}

/// Revenue over the lookback window of a period
pub async fn get_revenue(
    State(state): State<AppState>,
    Query(params): Query<RevenueParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let period = Period::parse_or_default(params.period.as_deref())?;
    let report = state.services.reports.revenue(period).await?;
    Ok(success_response(report))
}

/// Revenue of two date ranges and their difference
pub async fn compare_revenue(
    State(state): State<AppState>,
    Query(params): Query<CompareRevenueParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let range_1 = DateRange::new(params.start_date_1, params.end_date_1)?;
    let range_2 = DateRange::new(params.start_date_2, params.end_date_2)?;
    let comparison = state
        .services
        .reports
        .compare_revenue(range_1, range_2)
        .await?;
    Ok(success_response(comparison))
}

/// Revenue grouped by product category
pub async fn revenue_by_category(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.reports.revenue_by_category().await?;
    Ok(success_response(rows))
}

/// Quantity and revenue per time bucket
pub async fn sales_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let period = Period::parse_or_default(params.period.as_deref())?;
    let filter = sales_filter(
        params.start_date,
        params.end_date,
        params.category,
        params.product_id,
    );
    let buckets = state.services.reports.sales_summary(period, filter).await?;
    Ok(success_response(buckets))
}

/// Top products by quantity sold
pub async fn best_sellers(
    State(state): State<AppState>,
    Query(params): Query<BestSellersParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = sales_filter(params.start_date, params.end_date, params.category, None);
    let rows = state
        .services
        .reports
        .best_sellers(params.top_n, filter)
        .await?;
    Ok(success_response(rows))
}
