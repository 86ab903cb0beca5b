//! HTTP API server with observability for the store catalog.
//!
//! Provides REST endpoints for products, customers, orders, reports and
//! CSV/JSON transfer, with structured logging (tracing) and Prometheus
//! metrics. Handlers only call [`store::Repository`] and
//! [`analytics::AnalyticsEngine`] operations.

pub mod config;
pub mod error;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use analytics::AnalyticsEngine;
use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Repository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState<R: Repository> {
    pub repo: Arc<R>,
    pub analytics: AnalyticsEngine<R>,
    pub export_dir: PathBuf,
}

impl<R: Repository> AppState<R> {
    pub fn new(repo: Arc<R>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            analytics: AnalyticsEngine::new(Arc::clone(&repo)),
            repo,
            export_dir: export_dir.into(),
        }
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: Repository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    use routes::{customers, orders, products, reports, transfer};

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/products",
            post(products::create::<R>).get(products::list::<R>),
        )
        .route(
            "/products/{id}",
            get(products::get::<R>).delete(products::delete::<R>),
        )
        .route("/products/{id}/quantity", put(products::update_quantity::<R>))
        .route(
            "/customers",
            post(customers::create::<R>).get(customers::list::<R>),
        )
        .route(
            "/customers/{id}",
            get(customers::get::<R>).delete(customers::delete::<R>),
        )
        .route("/customers/{id}/address", put(customers::update_address::<R>))
        .route("/customers/{id}/orders", get(customers::orders::<R>))
        .route("/orders", post(orders::create::<R>).get(orders::list::<R>))
        .route(
            "/orders/{id}",
            get(orders::get::<R>).delete(orders::delete::<R>),
        )
        .route("/orders/{id}/status", put(orders::update_status::<R>))
        .route("/reports/sales-by-date", get(reports::sales_by_date::<R>))
        .route("/reports/top-customers", get(reports::top_customers::<R>))
        .route("/reports/top-products", get(reports::top_products::<R>))
        .route(
            "/reports/status-distribution",
            get(reports::status_distribution::<R>),
        )
        .route("/reports/summary", get(reports::summary::<R>))
        .route("/transfer/export/csv", post(transfer::export_csv::<R>))
        .route("/transfer/export/json", post(transfer::export_json::<R>))
        .route("/transfer/import/csv", post(transfer::import_csv::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
