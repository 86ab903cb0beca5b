//! Reporting endpoints backed by the analytics engine.

use std::sync::Arc;

use analytics::{SalesByDate, StatusDistribution, SummaryStatistics, TopCustomers, TopProducts};
use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use store::Repository;

use crate::AppState;
use crate::error::ApiError;

const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub n: Option<usize>,
}

impl TopQuery {
    fn limit(&self) -> usize {
        self.n.unwrap_or(DEFAULT_TOP_N)
    }
}

/// GET /reports/sales-by-date
#[tracing::instrument(skip(state))]
pub async fn sales_by_date<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<SalesByDate>, ApiError> {
    Ok(Json(state.analytics.sales_by_date().await?))
}

/// GET /reports/top-customers?n=5
#[tracing::instrument(skip(state))]
pub async fn top_customers<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<TopQuery>,
) -> Result<Json<TopCustomers>, ApiError> {
    Ok(Json(state.analytics.top_customers(query.limit()).await?))
}

/// GET /reports/top-products?n=5
#[tracing::instrument(skip(state))]
pub async fn top_products<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<TopQuery>,
) -> Result<Json<TopProducts>, ApiError> {
    Ok(Json(state.analytics.top_products(query.limit()).await?))
}

/// GET /reports/status-distribution
#[tracing::instrument(skip(state))]
pub async fn status_distribution<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<StatusDistribution>, ApiError> {
    Ok(Json(state.analytics.status_distribution().await?))
}

/// GET /reports/summary
#[tracing::instrument(skip(state))]
pub async fn summary<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<SummaryStatistics>, ApiError> {
    Ok(Json(state.analytics.summary_statistics().await?))
}
