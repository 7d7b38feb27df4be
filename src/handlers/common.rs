use crate::{
    config::AppConfig,
    errors::ServiceError,
    filters::{Pagination, SalesFilter},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Offset pagination parameters for list operations
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PaginationParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationParams {
    pub fn resolve(&self, config: &AppConfig) -> Result<Pagination, ServiceError> {
        resolve_pagination(self.skip, self.limit, config)
    }
}

pub(crate) fn resolve_pagination(
    skip: Option<u64>,
    limit: Option<u64>,
    config: &AppConfig,
) -> Result<Pagination, ServiceError> {
    Pagination::from_request(skip, limit, config.default_page_size, config.max_page_size)
}

/// Optional sale filters shared by the listing and reporting endpoints
pub(crate) fn sales_filter(
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    category: Option<String>,
    product_id: Option<i32>,
) -> SalesFilter {
    SalesFilter {
        start_date,
        end_date,
        category: category.filter(|c| !c.trim().is_empty()),
        product_id,
    }
}
