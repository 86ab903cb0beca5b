//! Typed rows produced by the storage layer.
//!
//! Rows are decoded into these records first and then converted into domain
//! entities, which re-run their validation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, ProductId};
use domain::{Customer, LineItem, Money, Order, Product, ValidationError};
use sqlx::FromRow;

use crate::Result;

#[derive(Debug, Clone, FromRow)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub description: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> std::result::Result<Self, Self::Error> {
        Product::restore(
            ProductId::new(record.id),
            record.name,
            Money::from_cents(record.price_cents),
            record.description,
            record.quantity,
            record.created_at,
        )
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CustomerRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub orders_count: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRecord> for Customer {
    type Error = ValidationError;

    fn try_from(record: CustomerRecord) -> std::result::Result<Self, Self::Error> {
        Customer::restore(
            CustomerId::new(record.id),
            record.name,
            record.email,
            record.phone,
            record.address,
            record.orders_count,
            record.created_at,
        )
    }
}

/// An order header row.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRecord {
    pub id: i64,
    pub customer_id: i64,
    pub status: String,
    pub total_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// A raw order_items row.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRecord {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

/// An order_items row joined against the current products row.
#[derive(Debug, Clone, FromRow)]
pub struct LineItemRecord {
    pub order_id: i64,
    pub quantity: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price_cents: i64,
    pub description: String,
    pub stock: i64,
    pub product_created_at: DateTime<Utc>,
}

impl LineItemRecord {
    /// Joins a raw line against the product record it references.
    pub fn join(item: &OrderItemRecord, product: &ProductRecord) -> Self {
        Self {
            order_id: item.order_id,
            quantity: item.quantity,
            product_id: product.id,
            product_name: product.name.clone(),
            price_cents: product.price_cents,
            description: product.description.clone(),
            stock: product.quantity,
            product_created_at: product.created_at,
        }
    }
}

impl TryFrom<LineItemRecord> for LineItem {
    type Error = ValidationError;

    fn try_from(record: LineItemRecord) -> std::result::Result<Self, Self::Error> {
        let product = Product::restore(
            ProductId::new(record.product_id),
            record.product_name,
            Money::from_cents(record.price_cents),
            record.description,
            record.stock,
            record.product_created_at,
        )?;
        LineItem::new(product, record.quantity)
    }
}

/// Builds an order from its header and joined line rows.
pub fn assemble_order(header: OrderRecord, lines: Vec<LineItemRecord>) -> Result<Order> {
    let items = lines
        .into_iter()
        .map(LineItem::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Order::restore(
        OrderId::new(header.id),
        CustomerId::new(header.customer_id),
        header.status.parse()?,
        items,
        header.created_at,
    ))
}

/// Builds orders from headers and a flat list of joined lines.
///
/// Output follows header order; each order's lines keep their input order.
pub fn assemble_orders(headers: Vec<OrderRecord>, lines: Vec<LineItemRecord>) -> Result<Vec<Order>> {
    let mut by_order: HashMap<i64, Vec<LineItemRecord>> = HashMap::new();
    for line in lines {
        by_order.entry(line.order_id).or_default().push(line);
    }

    headers
        .into_iter()
        .map(|header| {
            let lines = by_order.remove(&header.id).unwrap_or_default();
            assemble_order(header, lines)
        })
        .collect()
}
