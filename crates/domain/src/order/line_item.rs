//! Order line items.

use common::ProductId;

use crate::entity::Entity;
use crate::error::ValidationError;
use crate::money::Money;
use crate::product::Product;

/// One (product, quantity) pairing within an order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    product: Product,
    quantity: i64,
    subtotal: Money,
}

impl LineItem {
    /// Creates a line item.
    ///
    /// Fails with `InvalidQuantity` if `quantity <= 0` or if `price * quantity`
    /// does not fit in an amount.
    pub fn new(product: Product, quantity: i64) -> Result<Self, ValidationError> {
        if quantity <= 0 {
            return Err(ValidationError::InvalidQuantity { quantity });
        }
        let subtotal = product
            .price()
            .checked_mul(quantity)
            .ok_or(ValidationError::InvalidQuantity { quantity })?;
        Ok(Self {
            product,
            quantity,
            subtotal,
        })
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Returns the id of the referenced product, if it is persisted.
    pub fn product_id(&self) -> Option<ProductId> {
        self.product.id()
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Returns `price * quantity`.
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }
}
