use crate::{
    db::DbPool,
    entities::{
        product::Entity as Product,
        sale::{self, Model as SaleModel},
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Input for recording a sale
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordSale {
    pub product_id: i32,
    /// Must be positive
    pub quantity: i32,
    /// Defaults to the time of recording
    pub sale_date: Option<DateTime<Utc>>,
}

/// Service for recording sales. Sales are immutable once written and do not
/// touch stock levels.
#[derive(Clone)]
pub struct SalesService {
    db_pool: Arc<DbPool>,
}

impl SalesService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn record_sale(&self, input: RecordSale) -> Result<SaleModel, ServiceError> {
        if input.quantity <= 0 {
            return Err(ServiceError::InvalidArgument(format!(
                "quantity must be positive (got {})",
                input.quantity
            )));
        }

        let db = &*self.db_pool;
        Product::find_by_id(input.product_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.product_id))
            })?;

        let sale = sale::ActiveModel {
            product_id: Set(input.product_id),
            quantity: Set(input.quantity),
            sale_date: Set(input.sale_date.unwrap_or_else(Utc::now)),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::db_error)?;

        counter!("stockroom_sales.recorded", 1);
        info!(
            sale_id = sale.id,
            product_id = sale.product_id,
            quantity = sale.quantity,
            "Sale recorded"
        );
        Ok(sale)
    }
}
