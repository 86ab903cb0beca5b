//! Analytics error types.

use thiserror::Error;

/// Errors that can occur while building a report.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The repository failed to load the source data.
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
