use crate::{
    db::{with_transaction, DbPool},
    entities::{
        inventory::{self, Model as InventoryModel},
        product::{self, Model as ProductModel},
    },
    errors::ServiceError,
    queries::{
        product_queries::{GetProductQuery, ListProductsQuery},
        Query,
    },
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::{Validate, ValidationError};

/// Input for registering a new product
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RegisterProduct {
    #[validate(custom = "validate_name")]
    pub name: String,
    #[validate(custom = "validate_category")]
    pub category: String,
    #[validate(custom = "validate_price")]
    pub price: Decimal,
    /// When present an inventory row is created in the same transaction
    #[validate(range(min = 0))]
    pub initial_stock: Option<i32>,
}

/// Prices are stored as NUMERIC(12, 2)
const PRICE_SCALE: u32 = 2;
// 10^10, the first value NUMERIC(12, 2) cannot hold
const PRICE_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let message = if price.is_sign_negative() && !price.is_zero() {
        "price must not be negative"
    } else if price.normalize().scale() > PRICE_SCALE {
        "price must have at most two decimal places"
    } else if *price >= PRICE_LIMIT {
        "price must be below 10000000000"
    } else {
        return Ok(());
    };

    let mut err = ValidationError::new("price");
    err.message = Some(message.into());
    Err(err)
}

fn validate_label(value: &str, max: usize, code: &'static str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 || len > max {
        let mut err = ValidationError::new(code);
        err.message = Some(format!("{} must be 1 to {} characters", code, max).into());
        return Err(err);
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_label(name, 255, "name")
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    validate_label(category, 100, "category")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredProduct {
    pub product: ProductModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventoryModel>,
}

/// Service for managing products
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    /// Creates a new product service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductModel>, ServiceError> {
        ListProductsQuery.execute(&self.db_pool).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, product_id: i32) -> Result<ProductModel, ServiceError> {
        GetProductQuery { product_id }.execute(&self.db_pool).await
    }

    /// Registers a product, and its inventory row when `initial_stock` is set
    #[instrument(skip(self), fields(name = %input.name, category = %input.category))]
    pub async fn register_product(
        &self,
        input: RegisterProduct,
    ) -> Result<RegisteredProduct, ServiceError> {
        input.validate()?;

        let registered = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let product = product::ActiveModel {
                    name: Set(input.name.trim().to_string()),
                    category: Set(input.category.trim().to_string()),
                    price: Set(input.price),
                    ..Default::default()
                }
                .insert(txn)
                .await
                .map_err(ServiceError::db_error)?;

                let inventory = match input.initial_stock {
                    Some(stock) => Some(
                        inventory::ActiveModel {
                            product_id: Set(product.id),
                            stock: Set(stock),
                            last_updated: Set(Utc::now()),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?,
                    ),
                    None => None,
                };

                Ok::<_, ServiceError>(RegisteredProduct { product, inventory })
            })
        })
        .await?;

        info!(
            product_id = registered.product.id,
            initial_stock = ?registered.inventory.as_ref().map(|i| i.stock),
            "Product registered"
        );
        Ok(registered)
    }
}
