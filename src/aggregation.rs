//! Report arithmetic over rows the store has already filtered and grouped.
//!
//! Quantities are summed in SQL per product; revenue is the exact product of
//! that sum and the `Decimal` price, so results are identical on every
//! backend. Only the calendar bucketing of the summary report runs over
//! individual sales.

use crate::errors::ServiceError;
use crate::filters::Period;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Units sold of one product over the filtered sales.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_id: i32,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub total_quantity: i64,
}

impl ProductSales {
    /// total quantity × current price
    pub fn revenue(&self) -> Result<Decimal, ServiceError> {
        line_revenue(self.price, self.total_quantity)
    }
}

/// A single sale with the product price the summary report needs.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct SaleLine {
    pub sale_id: i32,
    pub product_id: i32,
    pub price: Decimal,
    pub quantity: i32,
    pub sale_date: DateTime<Utc>,
}

impl SaleLine {
    pub fn revenue(&self) -> Result<Decimal, ServiceError> {
        line_revenue(self.price, i64::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBucket {
    pub period: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSeller {
    pub product_id: i32,
    pub name: String,
    pub category: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

impl TryFrom<ProductSales> for BestSeller {
    type Error = ServiceError;

    fn try_from(row: ProductSales) -> Result<Self, Self::Error> {
        let total_revenue = row.revenue()?.round_dp(2);
        Ok(Self {
            product_id: row.product_id,
            name: row.name,
            category: row.category,
            total_quantity: row.total_quantity,
            total_revenue,
        })
    }
}

fn overflow() -> ServiceError {
    ServiceError::InternalError("revenue exceeds the representable range".to_string())
}

fn line_revenue(price: Decimal, quantity: i64) -> Result<Decimal, ServiceError> {
    price.checked_mul(Decimal::from(quantity)).ok_or_else(overflow)
}

fn accumulate(total: &mut Decimal, amount: Decimal) -> Result<(), ServiceError> {
    *total = total.checked_add(amount).ok_or_else(overflow)?;
    Ok(())
}

/// Sum of per-product revenue; zero for no rows.
pub fn total_revenue(rows: &[ProductSales]) -> Result<Decimal, ServiceError> {
    let mut total = Decimal::ZERO;
    for row in rows {
        accumulate(&mut total, row.revenue()?)?;
    }
    Ok(total)
}

/// One row per category present, ordered by category name.
pub fn revenue_by_category(rows: &[ProductSales]) -> Result<Vec<CategoryRevenue>, ServiceError> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for row in rows {
        accumulate(totals.entry(row.category.as_str()).or_default(), row.revenue()?)?;
    }

    Ok(totals
        .into_iter()
        .map(|(category, revenue)| CategoryRevenue {
            category: category.to_string(),
            revenue,
        })
        .collect())
}

/// Buckets lines by the period's truncation of `sale_date`, ascending by key.
pub fn summarize(lines: &[SaleLine], period: Period) -> Result<Vec<SummaryBucket>, ServiceError> {
    let mut buckets: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
    for line in lines {
        let entry = buckets
            .entry(period.bucket_key(line.sale_date))
            .or_insert((0, Decimal::ZERO));
        entry.0 += i64::from(line.quantity);
        accumulate(&mut entry.1, line.revenue()?)?;
    }

    Ok(buckets
        .into_iter()
        .map(|(period, (total_quantity, total_revenue))| SummaryBucket {
            period,
            total_quantity,
            total_revenue: total_revenue.round_dp(2),
        })
        .collect())
}
