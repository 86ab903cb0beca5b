//! Persistence layer for the store catalog.
//!
//! The [`Repository`] trait is the only way to mutate stored state. It is the
//! sole authority for identity assignment, email uniqueness, and referential
//! integrity between orders, customers, and products.

pub mod error;
pub mod memory;
pub mod records;
pub mod repository;
pub mod sqlite;
pub mod transfer;

pub use error::{Result, StoreError};
pub use memory::InMemoryRepository;
pub use repository::Repository;
pub use sqlite::SqliteRepository;
pub use transfer::{ExportedFiles, ImportReport, export_csv, export_json, import_csv};
