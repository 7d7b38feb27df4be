//! Composable predicates over `sales ⋈ products` plus the period keywords
//! shared by the reporting operations.

use crate::entities::{product, sale};
use crate::errors::ServiceError;
use chrono::{DateTime, Datelike, Duration, Utc};
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reporting period keyword.
///
/// A period selects both a fixed lookback window anchored at "now" and the
/// truncation used to bucket sales in the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl Default for Period {
    fn default() -> Self {
        Period::Daily
    }
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Daily, Period::Weekly, Period::Monthly, Period::Annual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Annual => "annual",
        }
    }

    /// Fixed-length lookback. Not calendar aware: a month is 30 days.
    pub fn lookback(&self) -> Duration {
        match self {
            Period::Daily => Duration::days(1),
            Period::Weekly => Duration::days(7),
            Period::Monthly => Duration::days(30),
            Period::Annual => Duration::days(365),
        }
    }

    /// Earliest sale date included when the window is anchored at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.lookback()
    }

    /// Summary bucket a timestamp falls in. Keys sort lexicographically in
    /// chronological order.
    pub fn bucket_key(&self, ts: DateTime<Utc>) -> String {
        match self {
            Period::Daily => ts.format("%Y-%m-%d").to_string(),
            Period::Weekly => {
                let week = ts.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Period::Monthly => ts.format("%Y-%m").to_string(),
            Period::Annual => format!("{:04}", ts.year()),
        }
    }

    /// Parses an optional keyword, falling back to daily when absent.
    pub fn parse_or_default(raw: Option<&str>) -> Result<Self, ServiceError> {
        match raw {
            Some(value) => value.parse(),
            None => Ok(Period::default()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "annual" => Ok(Period::Annual),
            other => Err(ServiceError::InvalidArgument(format!(
                "Invalid period '{}'; expected one of daily, weekly, monthly, annual",
                other
            ))),
        }
    }
}

/// Inclusive date range used by the revenue comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ServiceError> {
        if start > end {
            return Err(ServiceError::InvalidArgument(format!(
                "Date range start {} is after end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }
}

/// Optional predicates over a sale joined with its product.
///
/// Every unset field imposes no constraint. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub product_id: Option<i32>,
}

impl SalesFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn until(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn within(self, range: DateRange) -> Self {
        self.since(range.start).until(range.end)
    }

    pub fn in_period(self, period: Period, now: DateTime<Utc>) -> Self {
        self.since(period.window_start(now))
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn product(mut self, product_id: i32) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Drops the product constraint (best sellers group by product).
    pub fn without_product(mut self) -> Self {
        self.product_id = None;
        self
    }

    /// Builds the SQL condition. Product columns require the products
    /// table to be joined into the select.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(start) = self.start_date {
            cond = cond.add(sale::Column::SaleDate.gte(start));
        }
        if let Some(end) = self.end_date {
            cond = cond.add(sale::Column::SaleDate.lte(end));
        }
        if let Some(category) = &self.category {
            cond = cond.add(product::Column::Category.eq(category.clone()));
        }
        if let Some(product_id) = self.product_id {
            cond = cond.add(sale::Column::ProductId.eq(product_id));
        }

        cond
    }
}

/// Zero-based offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: 10 }
    }
}

impl Pagination {
    pub fn new(skip: u64, limit: u64) -> Result<Self, ServiceError> {
        if limit == 0 {
            return Err(ServiceError::InvalidArgument(
                "limit must be a positive integer".to_string(),
            ));
        }
        Ok(Self { skip, limit })
    }

    /// Resolves optional request values against configured defaults.
    pub fn from_request(
        skip: Option<u64>,
        limit: Option<u64>,
        default_limit: u64,
        max_limit: u64,
    ) -> Result<Self, ServiceError> {
        let limit = limit.unwrap_or(default_limit);
        if limit > max_limit {
            return Err(ServiceError::InvalidArgument(format!(
                "limit must not exceed {}",
                max_limit
            )));
        }
        Self::new(skip.unwrap_or(0), limit)
    }
}
