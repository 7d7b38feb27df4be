use super::Query;
use crate::{
    entities::product::{self, Entity as Product, Model as ProductModel},
    errors::ServiceError,
};
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListProductsQuery;

#[async_trait]
impl Query for ListProductsQuery {
    type Result = Vec<ProductModel>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Product::find()
            .order_by_asc(product::Column::Id)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProductQuery {
    pub product_id: i32,
}

#[async_trait]
impl Query for GetProductQuery {
    type Result = ProductModel;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Product::find_by_id(self.product_id)
            .one(db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", self.product_id)))
    }
}
