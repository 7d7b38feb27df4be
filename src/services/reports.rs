use crate::{
    aggregation::{BestSeller, CategoryRevenue, SummaryBucket},
    db::DbPool,
    entities::sale::Model as SaleModel,
    errors::ServiceError,
    filters::{DateRange, Pagination, Period, SalesFilter},
    queries::{
        sales_queries::{
            BestSellersQuery, CompareRevenueQuery, ListSalesQuery, RevenueByCategoryQuery,
            RevenueComparison, RevenueForPeriodQuery, RevenueReport, SalesSummaryQuery,
        },
        Query,
    },
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

/// Reporting engine over sales joined with products. Revenue is always
/// quantity × the product's current price.
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
    best_sellers_default: u64,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>, best_sellers_default: u64) -> Self {
        Self {
            db_pool,
            best_sellers_default,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_sales(
        &self,
        filter: SalesFilter,
        pagination: Pagination,
    ) -> Result<Vec<SaleModel>, ServiceError> {
        ListSalesQuery { filter, pagination }
            .execute(&self.db_pool)
            .await
    }

    /// Revenue over the period's lookback window ending now
    pub async fn revenue(&self, period: Period) -> Result<RevenueReport, ServiceError> {
        self.revenue_as_of(period, Utc::now()).await
    }

    #[instrument(skip(self))]
    pub async fn revenue_as_of(
        &self,
        period: Period,
        as_of: DateTime<Utc>,
    ) -> Result<RevenueReport, ServiceError> {
        let report = RevenueForPeriodQuery { period, as_of }
            .execute(&self.db_pool)
            .await?;
        info!(period = %period, revenue = %report.revenue, "Revenue computed");
        Ok(report)
    }

    #[instrument(skip(self))]
    pub async fn compare_revenue(
        &self,
        range_1: DateRange,
        range_2: DateRange,
    ) -> Result<RevenueComparison, ServiceError> {
        CompareRevenueQuery { range_1, range_2 }
            .execute(&self.db_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn revenue_by_category(&self) -> Result<Vec<CategoryRevenue>, ServiceError> {
        RevenueByCategoryQuery::default()
            .execute(&self.db_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn sales_summary(
        &self,
        period: Period,
        filter: SalesFilter,
    ) -> Result<Vec<SummaryBucket>, ServiceError> {
        SalesSummaryQuery { period, filter }
            .execute(&self.db_pool)
            .await
    }

    /// Top sellers by quantity; `top_n` falls back to the configured default
    #[instrument(skip(self))]
    pub async fn best_sellers(
        &self,
        top_n: Option<u64>,
        filter: SalesFilter,
    ) -> Result<Vec<BestSeller>, ServiceError> {
        BestSellersQuery {
            top_n: top_n.unwrap_or(self.best_sellers_default),
            filter,
        }
        .execute(&self.db_pool)
        .await
    }
}
