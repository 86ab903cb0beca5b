use common::{CustomerId, ProductId};
use domain::ValidationError;
use thiserror::Error;

/// Errors that can occur when interacting with the repository.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another customer already uses this email.
    #[error("Customer with email {email} already exists")]
    DuplicateEmail { email: String },

    /// The referenced customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A line item references a product that was never persisted.
    #[error("Order line references a product without identity: {name}")]
    TransientProduct { name: String },

    /// The record is referenced by an order and cannot be deleted.
    #[error("{entity} {id} is still referenced by existing orders")]
    StillReferenced { entity: &'static str, id: i64 },

    /// Stored or supplied values failed domain validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Row-oriented encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Document-oriented encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem access failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns true for uniqueness and reference conflicts.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateEmail { .. } | StoreError::StillReferenced { .. }
        )
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StoreError>;
