//! Product entity.

use chrono::{DateTime, Utc};
use common::ProductId;

use crate::entity::Entity;
use crate::error::ValidationError;
use crate::money::Money;

/// A catalog product.
///
/// The price is fixed at creation. Only the stock quantity changes, and it
/// never goes below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: Option<ProductId>,
    name: String,
    price: Money,
    description: String,
    quantity: i64,
    created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new transient product.
    ///
    /// Fails with `InvalidPrice` if `price <= 0`, `InvalidQuantity` if
    /// `quantity < 0`, and `EmptyName` if the name is blank.
    pub fn create(
        name: impl Into<String>,
        price: Money,
        description: impl Into<String>,
        quantity: i64,
    ) -> Result<Self, ValidationError> {
        if !price.is_positive() {
            return Err(ValidationError::InvalidPrice { price });
        }

        if quantity < 0 {
            return Err(ValidationError::InvalidQuantity { quantity });
        }

        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(Self {
            id: None,
            name,
            price,
            description: description.into(),
            quantity,
            created_at: Utc::now(),
        })
    }

    /// Rebuilds a persisted product from stored fields.
    pub fn restore(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        description: impl Into<String>,
        quantity: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let mut product = Self::create(name, price, description, quantity)?;
        product.id = Some(id);
        product.created_at = created_at;
        Ok(product)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the quantity in stock.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Adjusts the stock quantity by a signed delta.
    ///
    /// Fails with `InsufficientStock` (carrying the available quantity) if
    /// the result would be negative, and `InvalidQuantity` if it overflows.
    /// The quantity is left unchanged on failure.
    pub fn adjust_quantity(&mut self, delta: i64) -> Result<(), ValidationError> {
        let new_quantity = self
            .quantity
            .checked_add(delta)
            .ok_or(ValidationError::InvalidQuantity { quantity: delta })?;
        if new_quantity < 0 {
            return Err(ValidationError::InsufficientStock {
                available: self.quantity,
                requested: delta,
            });
        }
        self.quantity = new_quantity;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn entity_type() -> &'static str {
        "Product"
    }

    fn id(&self) -> Option<ProductId> {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
