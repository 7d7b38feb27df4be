//! Read-side operations. Each query is a plain struct carrying its
//! parameters and executes against a borrowed connection.

use crate::errors::ServiceError;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

pub mod inventory_queries;
pub mod product_queries;
pub mod sales_queries;

#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError>;
}
