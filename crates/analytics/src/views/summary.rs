//! Catalog-wide summary statistics.

use domain::{Customer, Money, Order, Product};
use serde::Serialize;

use crate::report::Report;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total_products: usize,
    pub total_customers: usize,
    pub total_orders: usize,
    pub total_revenue: Money,
    /// Rounded to the nearest cent, half away from zero.
    pub average_order_value: Money,
    pub total_items_sold: i64,
    pub average_items_per_order: f64,
}

/// Divides and rounds half away from zero. `divisor` must be positive.
fn rounded_div(dividend: i64, divisor: i64) -> i64 {
    let quotient = dividend / divisor;
    let remainder = dividend % divisor;
    if remainder.abs() * 2 >= divisor {
        quotient + dividend.signum()
    } else {
        quotient
    }
}

impl SummaryStatistics {
    pub fn from_entities(products: &[Product], customers: &[Customer], orders: &[Order]) -> Self {
        let total_revenue: Money = orders.iter().map(Order::total_price).sum();
        let total_items_sold: i64 = orders.iter().map(Order::items_count).sum();

        let order_count = orders.len() as i64;
        let (average_order_value, average_items_per_order) = if order_count == 0 {
            (Money::zero(), 0.0)
        } else {
            (
                Money::from_cents(rounded_div(total_revenue.cents(), order_count)),
                total_items_sold as f64 / order_count as f64,
            )
        };

        Self {
            total_products: products.len(),
            total_customers: customers.len(),
            total_orders: orders.len(),
            total_revenue,
            average_order_value,
            total_items_sold,
            average_items_per_order,
        }
    }
}

impl Report for SummaryStatistics {
    fn name(&self) -> &'static str {
        "SummaryStatistics"
    }

    /// The number of orders the statistics were computed over.
    fn len(&self) -> usize {
        self.total_orders
    }
}
