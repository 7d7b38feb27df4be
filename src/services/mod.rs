pub mod inventory;
pub mod product_service;
pub mod reports;
pub mod sales;

use crate::{config::AppConfig, db::DbPool};
use std::sync::Arc;

/// Services shared by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub inventory: inventory::InventoryService,
    pub products: product_service::ProductService,
    pub sales: sales::SalesService,
    pub reports: reports::ReportService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        Self {
            inventory: inventory::InventoryService::new(
                db_pool.clone(),
                config.low_stock_threshold,
            ),
            products: product_service::ProductService::new(db_pool.clone()),
            sales: sales::SalesService::new(db_pool.clone()),
            reports: reports::ReportService::new(db_pool, config.best_sellers_default),
        }
    }
}
