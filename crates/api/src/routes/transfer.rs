//! Export and import endpoints. Files live in the configured export directory.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use store::{ExportedFiles, ImportReport, Repository};

use crate::AppState;
use crate::error::ApiError;

/// POST /transfer/export/csv: write products, customers and orders as CSV.
#[tracing::instrument(skip(state))]
pub async fn export_csv<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<ExportedFiles>, ApiError> {
    let files = store::export_csv(state.repo.as_ref(), &state.export_dir).await?;
    Ok(Json(files))
}

/// POST /transfer/export/json: write products, customers and orders as JSON.
#[tracing::instrument(skip(state))]
pub async fn export_json<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<ExportedFiles>, ApiError> {
    let files = store::export_json(state.repo.as_ref(), &state.export_dir).await?;
    Ok(Json(files))
}

/// POST /transfer/import/csv: load products.csv and customers.csv.
#[tracing::instrument(skip(state))]
pub async fn import_csv<R: Repository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<ImportReport>, ApiError> {
    let report = store::import_csv(state.repo.as_ref(), &state.export_dir).await?;
    Ok(Json(report))
}
