//! Domain validation errors.

use thiserror::Error;

use crate::money::Money;

/// Errors raised when an entity is constructed or mutated with bad values.
///
/// A failed operation never leaves the entity partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Product name is empty or whitespace.
    #[error("Product name must not be empty")]
    EmptyName,

    /// Price is zero or negative.
    #[error("Invalid price: {price} (must be greater than 0)")]
    InvalidPrice { price: Money },

    /// Quantity is outside the allowed range for the operation.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// A stock adjustment would drive the quantity below zero.
    #[error("Insufficient stock: cannot apply change of {requested}, available {available}")]
    InsufficientStock { available: i64, requested: i64 },

    /// Email does not look like local@domain.tld.
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// Phone is not an E.164-like number.
    #[error("Invalid phone format: {0}")]
    InvalidPhone(String),

    /// Status is not one of the recognized order statuses.
    #[error(
        "Invalid order status: {0} (expected one of pending, processing, shipped, delivered, cancelled)"
    )]
    InvalidStatus(String),

    /// Monetary amount could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Order was created without a usable customer id.
    #[error("Customer ID is required")]
    CustomerIdRequired,
}
