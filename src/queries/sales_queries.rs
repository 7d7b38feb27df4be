use super::Query;
use crate::{
    aggregation::{self, BestSeller, CategoryRevenue, ProductSales, SaleLine, SummaryBucket},
    entities::{
        product,
        sale::{self, Entity as Sale, Model as SaleModel},
    },
    errors::ServiceError,
    filters::{DateRange, Pagination, Period, SalesFilter},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, SimpleExpr},
    DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn quantity_sum() -> SimpleExpr {
    Expr::col((Sale, sale::Column::Quantity)).sum()
}

/// Sales matching `filter` grouped per product, with the summed quantity.
fn product_sales(filter: &SalesFilter) -> Select<Sale> {
    Sale::find()
        .select_only()
        .column(sale::Column::ProductId)
        .column(product::Column::Name)
        .column(product::Column::Category)
        .column(product::Column::Price)
        .column_as(quantity_sum(), "total_quantity")
        .join(JoinType::InnerJoin, sale::Relation::Product.def())
        .filter(filter.condition())
        .group_by(sale::Column::ProductId)
        .group_by(product::Column::Name)
        .group_by(product::Column::Category)
        .group_by(product::Column::Price)
}

/// Per-product totals for every product with a sale matching `filter`.
async fn load_product_sales(
    db_pool: &DatabaseConnection,
    filter: &SalesFilter,
) -> Result<Vec<ProductSales>, ServiceError> {
    let rows = product_sales(filter)
        .order_by_asc(sale::Column::ProductId)
        .into_model::<ProductSales>()
        .all(db_pool)
        .await
        .map_err(ServiceError::db_error)?;

    debug!(products = rows.len(), "Loaded per-product sales");
    Ok(rows)
}

/// Loads every sale matching `filter` with its product price, ordered by
/// (sale_date, id).
async fn load_sale_lines(
    db_pool: &DatabaseConnection,
    filter: &SalesFilter,
) -> Result<Vec<SaleLine>, ServiceError> {
    let lines = Sale::find()
        .select_only()
        .column_as(sale::Column::Id, "sale_id")
        .column(sale::Column::ProductId)
        .column(product::Column::Price)
        .column(sale::Column::Quantity)
        .column(sale::Column::SaleDate)
        .join(JoinType::InnerJoin, sale::Relation::Product.def())
        .filter(filter.condition())
        .order_by_asc(sale::Column::SaleDate)
        .order_by_asc(sale::Column::Id)
        .into_model::<SaleLine>()
        .all(db_pool)
        .await
        .map_err(ServiceError::db_error)?;

    debug!(rows = lines.len(), "Loaded sale lines");
    Ok(lines)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSalesQuery {
    pub filter: SalesFilter,
    pub pagination: Pagination,
}

#[async_trait]
impl Query for ListSalesQuery {
    type Result = Vec<SaleModel>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        Sale::find()
            .join(JoinType::InnerJoin, sale::Relation::Product.def())
            .filter(self.filter.condition())
            .order_by_asc(sale::Column::SaleDate)
            .order_by_asc(sale::Column::Id)
            .offset(self.pagination.skip)
            .limit(self.pagination.limit)
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueReport {
    pub period: Period,
    pub revenue: Decimal,
}

/// Revenue over the period's lookback window ending at `as_of`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueForPeriodQuery {
    pub period: Period,
    pub as_of: DateTime<Utc>,
}

#[async_trait]
impl Query for RevenueForPeriodQuery {
    type Result = RevenueReport;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let filter = SalesFilter::new().in_period(self.period, self.as_of);
        let rows = load_product_sales(db_pool, &filter).await?;

        Ok(RevenueReport {
            period: self.period,
            revenue: aggregation::total_revenue(&rows)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRevenue {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueComparison {
    pub period_1: RangeRevenue,
    pub period_2: RangeRevenue,
    /// period_2 minus period_1
    pub difference: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRevenueQuery {
    pub range_1: DateRange,
    pub range_2: DateRange,
}

impl CompareRevenueQuery {
    async fn revenue_in(
        db_pool: &DatabaseConnection,
        range: DateRange,
    ) -> Result<RangeRevenue, ServiceError> {
        let rows = load_product_sales(db_pool, &SalesFilter::new().within(range)).await?;
        Ok(RangeRevenue {
            start: range.start,
            end: range.end,
            revenue: aggregation::total_revenue(&rows)?,
        })
    }
}

#[async_trait]
impl Query for CompareRevenueQuery {
    type Result = RevenueComparison;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let period_1 = Self::revenue_in(db_pool, self.range_1).await?;
        let period_2 = Self::revenue_in(db_pool, self.range_2).await?;
        let difference = period_2.revenue - period_1.revenue;

        Ok(RevenueComparison {
            period_1,
            period_2,
            difference,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevenueByCategoryQuery {
    pub filter: SalesFilter,
}

#[async_trait]
impl Query for RevenueByCategoryQuery {
    type Result = Vec<CategoryRevenue>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let rows = load_product_sales(db_pool, &self.filter).await?;
        aggregation::revenue_by_category(&rows)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummaryQuery {
    pub period: Period,
    pub filter: SalesFilter,
}

#[async_trait]
impl Query for SalesSummaryQuery {
    type Result = Vec<SummaryBucket>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        let lines = load_sale_lines(db_pool, &self.filter).await?;
        aggregation::summarize(&lines, self.period)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestSellersQuery {
    pub top_n: u64,
    pub filter: SalesFilter,
}

#[async_trait]
impl Query for BestSellersQuery {
    type Result = Vec<BestSeller>;

    async fn execute(&self, db_pool: &DatabaseConnection) -> Result<Self::Result, ServiceError> {
        if self.top_n == 0 {
            return Err(ServiceError::InvalidArgument(
                "top_n must be a positive integer".to_string(),
            ));
        }

        let filter = self.filter.clone().without_product();
        let rows = product_sales(&filter)
            .order_by_desc(quantity_sum())
            .order_by_asc(sale::Column::ProductId)
            .limit(self.top_n)
            .into_model::<ProductSales>()
            .all(db_pool)
            .await
            .map_err(ServiceError::db_error)?;

        rows.into_iter().map(BestSeller::try_from).collect()
    }
}
