//! Domain layer for the store catalog.
//!
//! This crate provides the invariant-preserving entities:
//! - [`Product`] with a fixed price and an adjustable stock quantity
//! - [`Customer`] with validated contact details and a lifetime order counter
//! - [`Order`] with line items and a total that is always recomputed
//!
//! Entities validate on construction and on every mutation. Identity is
//! assigned by the storage layer; a freshly created entity has none.

pub mod customer;
pub mod entity;
pub mod error;
pub mod money;
pub mod order;
pub mod product;
pub mod sorting;

pub use common::{CustomerId, OrderId, ProductId};
pub use customer::Customer;
pub use entity::Entity;
pub use error::ValidationError;
pub use money::Money;
pub use order::{LineItem, Order, OrderStatus};
pub use product::Product;
pub use sorting::{sort_customers_by_orders, sort_orders_by_date, sort_orders_by_price};
