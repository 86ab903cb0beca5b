//! Top products ranked by quantity sold.

use std::collections::HashMap;

use common::ProductId;
use domain::{Money, Order};
use serde::Serialize;

use crate::report::Report;

/// Accumulated sales of one product across all orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub revenue: Money,
}

/// The first `n` products by quantity sold. Equal quantities keep the order
/// in which the products were first seen.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopProducts {
    pub products: Vec<ProductSales>,
}

impl TopProducts {
    /// Builds the ranking from order line items.
    ///
    /// Revenue is valued at the price carried by each line's product. Lines
    /// whose product has no identity are not counted.
    pub fn from_orders(orders: &[Order], n: usize) -> Self {
        let mut sales: Vec<ProductSales> = Vec::new();
        let mut index: HashMap<ProductId, usize> = HashMap::new();

        for item in orders.iter().flat_map(|order| order.items()) {
            let Some(product_id) = item.product_id() else {
                continue;
            };
            let slot = *index.entry(product_id).or_insert_with(|| {
                sales.push(ProductSales {
                    product_id,
                    name: item.product().name().to_string(),
                    quantity: 0,
                    revenue: Money::zero(),
                });
                sales.len() - 1
            });
            sales[slot].quantity += item.quantity();
            sales[slot].revenue += item.subtotal();
        }

        sales.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        sales.truncate(n);

        Self { products: sales }
    }
}

impl Report for TopProducts {
    fn name(&self) -> &'static str {
        "TopProducts"
    }

    fn len(&self) -> usize {
        self.products.len()
    }
}
