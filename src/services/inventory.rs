use crate::{
    db::{with_transaction, DbPool},
    entities::{
        inventory::{self, Model as InventoryModel},
        inventory_history::{self, Model as InventoryHistoryModel},
        product::Entity as Product,
    },
    errors::ServiceError,
    filters::Pagination,
    queries::{
        inventory_queries::{
            find_inventory_by_product, GetInventoryHistoryQuery, GetLowStockItemsQuery,
            ListInventoryQuery,
        },
        Query,
    },
};
use chrono::Utc;
use metrics::counter;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of a stock mutation: the row after the change and the audit entry
/// written with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockChange {
    pub inventory: InventoryModel,
    pub history: InventoryHistoryModel,
}

/// Service for reading and mutating stock levels
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    low_stock_threshold: i32,
}

impl InventoryService {
    /// Creates a new inventory service instance
    pub fn new(db_pool: Arc<DbPool>, low_stock_threshold: i32) -> Self {
        Self {
            db_pool,
            low_stock_threshold,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_inventory(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        ListInventoryQuery { pagination }
            .execute(&self.db_pool)
            .await
    }

    /// Inventory rows with stock strictly below `threshold` (or the
    /// configured default).
    #[instrument(skip(self))]
    pub async fn low_stock(
        &self,
        threshold: Option<i32>,
        pagination: Pagination,
    ) -> Result<Vec<InventoryModel>, ServiceError> {
        GetLowStockItemsQuery {
            threshold: threshold.unwrap_or(self.low_stock_threshold),
            pagination,
        }
        .execute(&self.db_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn history(
        &self,
        product_id: i32,
        pagination: Pagination,
    ) -> Result<Vec<InventoryHistoryModel>, ServiceError> {
        GetInventoryHistoryQuery {
            product_id,
            pagination,
        }
        .execute(&self.db_pool)
        .await
    }

    /// Sets the stock of a product and appends the matching history row.
    ///
    /// The transaction opens with a write to the inventory row, so it holds
    /// the row lock (Postgres) or the database write lock (SQLite) before it
    /// reads the current stock. Concurrent updates of one product therefore
    /// queue behind each other and `old_stock` always reflects the value this
    /// transaction replaced.
    #[instrument(skip(self))]
    pub async fn update_inventory(
        &self,
        product_id: i32,
        new_stock: i32,
    ) -> Result<InventoryModel, ServiceError> {
        self.set_stock(product_id, new_stock)
            .await
            .map(|change| change.inventory)
    }

    /// Same as [`update_inventory`](Self::update_inventory) but also returns
    /// the history row.
    #[instrument(skip(self))]
    pub async fn set_stock(
        &self,
        product_id: i32,
        new_stock: i32,
    ) -> Result<StockChange, ServiceError> {
        if new_stock < 0 {
            return Err(ServiceError::InvalidArgument(format!(
                "stock must not be negative (got {})",
                new_stock
            )));
        }

        let change = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let claimed = inventory::Entity::update_many()
                    .col_expr(
                        inventory::Column::Stock,
                        Expr::col(inventory::Column::Stock).into(),
                    )
                    .filter(inventory::Column::ProductId.eq(product_id))
                    .exec(txn)
                    .await
                    .map_err(ServiceError::transaction_failure)?;
                if claimed.rows_affected == 0 {
                    return Err(ServiceError::NotFound(format!(
                        "Inventory for product {} not found",
                        product_id
                    )));
                }

                let current = find_inventory_by_product(txn, product_id)
                    .await
                    .map_err(ServiceError::within_transaction)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "Inventory for product {} not found",
                            product_id
                        ))
                    })?;

                let now = Utc::now();
                let old_stock = current.stock;

                let mut active: inventory::ActiveModel = current.into();
                active.stock = Set(new_stock);
                active.last_updated = Set(now);
                let updated = active
                    .update(txn)
                    .await
                    .map_err(ServiceError::transaction_failure)?;

                let history = inventory_history::ActiveModel {
                    inventory_id: Set(updated.id),
                    old_stock: Set(old_stock),
                    new_stock: Set(new_stock),
                    change_date: Set(now),
                    ..Default::default()
                }
                .insert(txn)
                .await
                .map_err(ServiceError::transaction_failure)?;

                Ok::<_, ServiceError>(StockChange {
                    inventory: updated,
                    history,
                })
            })
        })
        .await
        .map_err(ServiceError::within_transaction)?;

        counter!("stockroom_inventory.updates", 1);
        info!(
            product_id,
            old_stock = change.history.old_stock,
            new_stock = change.history.new_stock,
            "Inventory updated"
        );

        Ok(change)
    }

    /// Creates the single inventory row of a product. No history row is
    /// written; history records mutations only.
    #[instrument(skip(self))]
    pub async fn create_inventory(
        &self,
        product_id: i32,
        stock: i32,
    ) -> Result<InventoryModel, ServiceError> {
        if stock < 0 {
            return Err(ServiceError::InvalidArgument(format!(
                "stock must not be negative (got {})",
                stock
            )));
        }

        let created = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                Product::find_by_id(product_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::db_error)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Product {} not found", product_id))
                    })?;

                if find_inventory_by_product(txn, product_id).await?.is_some() {
                    return Err(ServiceError::Conflict(format!(
                        "Inventory for product {} already exists",
                        product_id
                    )));
                }

                inventory::ActiveModel {
                    product_id: Set(product_id),
                    stock: Set(stock),
                    last_updated: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(txn)
                .await
                .map_err(ServiceError::db_error)
            })
        })
        .await
        .map_err(|e| {
            warn!(product_id, error = %e, "Inventory creation failed");
            e
        })?;

        info!(product_id, stock, inventory_id = created.id, "Inventory created");
        Ok(created)
    }
}
