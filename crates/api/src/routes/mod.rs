//! Route handlers grouped by resource.

pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod reports;
pub mod transfer;
