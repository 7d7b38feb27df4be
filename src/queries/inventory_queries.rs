use super::Query;
use crate::{
    entities::{
        inventory::{self, Entity as Inventory, Model as InventoryModel},
        inventory_history::{self, Entity as InventoryHistory, Model as InventoryHistoryModel},
    },
    errors::ServiceError,
    filters::Pagination,
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::{Deserialize, Serialize};

/// Looks up the inventory row of a product on any connection or transaction.
pub async fn find_inventory_by_product<C>(
    conn: &C,
    product_id: i32,
) -> Result<Option<InventoryModel>, ServiceError>
where
    C: ConnectionTrait,
{
    Inventory::find()
        .filter(inventory::Column::ProductId.eq(product_id))
        .one(conn)
        .await
        .map_err(ServiceError::db_error)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListInventoryQuery {
    pub pagination: Pagination,
}

#[async_trait]
impl Query for ListInventoryQuery {
    type Result = Vec<InventoryModel>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Inventory::find()
            .order_by_asc(inventory::Column::Id)
            .offset(self.pagination.skip)
            .limit(self.pagination.limit)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetInventoryByProductQuery {
    pub product_id: i32,
}

#[async_trait]
impl Query for GetInventoryByProductQuery {
    type Result = InventoryModel;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        find_inventory_by_product(db_pool, self.product_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Inventory for product {} not found",
                    self.product_id
                ))
            })
    }
}

/// Rows with stock strictly below `threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetLowStockItemsQuery {
    pub threshold: i32,
    pub pagination: Pagination,
}

#[async_trait]
impl Query for GetLowStockItemsQuery {
    type Result = Vec<InventoryModel>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        if self.threshold < 0 {
            return Err(ServiceError::InvalidArgument(
                "threshold must not be negative".to_string(),
            ));
        }

        Inventory::find()
            .filter(inventory::Column::Stock.lt(self.threshold))
            .order_by_asc(inventory::Column::Id)
            .offset(self.pagination.skip)
            .limit(self.pagination.limit)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// History of a product's inventory, most recent change first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetInventoryHistoryQuery {
    pub product_id: i32,
    pub pagination: Pagination,
}

#[async_trait]
impl Query for GetInventoryHistoryQuery {
    type Result = Vec<InventoryHistoryModel>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let item = GetInventoryByProductQuery {
            product_id: self.product_id,
        }
        .execute(db_pool)
        .await?;

        InventoryHistory::find()
            .filter(inventory_history::Column::InventoryId.eq(item.id))
            .order_by_desc(inventory_history::Column::ChangeDate)
            .order_by_desc(inventory_history::Column::Id)
            .offset(self.pagination.skip)
            .limit(self.pagination.limit)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}
