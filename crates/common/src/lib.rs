//! Shared identity types used across the store catalog crates.

pub mod types;

pub use types::{CustomerId, OrderId, ProductId};
