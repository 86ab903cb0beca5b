//! Builds reports from repository queries.

use std::sync::Arc;

use store::Repository;
use tracing::debug;

use crate::Result;
use crate::report::Report;
use crate::views::{
    SalesByDate, StatusDistribution, SummaryStatistics, TopCustomers, TopProducts,
};

/// Read-only reporting over a repository.
///
/// The engine only calls query operations. Each report reflects whatever the
/// repository returns at the time of the call.
pub struct AnalyticsEngine<R: Repository> {
    repo: Arc<R>,
}

impl<R: Repository> Clone for AnalyticsEngine<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

fn record<T: Report>(report: T) -> T {
    debug!(report = report.name(), rows = report.len(), "report generated");
    metrics::counter!("analytics_reports_generated", "report" => report.name()).increment(1);
    report
}

impl<R: Repository> AnalyticsEngine<R> {
    /// Creates an engine over a shared repository handle.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn sales_by_date(&self) -> Result<SalesByDate> {
        let orders = self.repo.get_all_orders().await?;
        Ok(record(SalesByDate::from_orders(&orders)))
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn top_customers(&self, n: usize) -> Result<TopCustomers> {
        let customers = self.repo.get_all_customers().await?;
        Ok(record(TopCustomers::from_customers(&customers, n)))
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn top_products(&self, n: usize) -> Result<TopProducts> {
        let orders = self.repo.get_all_orders().await?;
        Ok(record(TopProducts::from_orders(&orders, n)))
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn status_distribution(&self) -> Result<StatusDistribution> {
        let orders = self.repo.get_all_orders().await?;
        Ok(record(StatusDistribution::from_orders(&orders)))
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn summary_statistics(&self) -> Result<SummaryStatistics> {
        let products = self.repo.get_all_products().await?;
        let customers = self.repo.get_all_customers().await?;
        let orders = self.repo.get_all_orders().await?;
        Ok(record(SummaryStatistics::from_entities(
            &products, &customers, &orders,
        )))
    }
}
