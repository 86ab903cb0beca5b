//! Stable sort helpers for entity listings.
//!
//! Equal keys keep their original relative order.

use crate::customer::Customer;
use crate::entity::Entity;
use crate::order::Order;

/// Sorts orders by creation time, oldest first unless `descending`.
pub fn sort_orders_by_date(orders: &mut [Order], descending: bool) {
    if descending {
        orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    } else {
        orders.sort_by_key(|order| order.created_at());
    }
}

/// Sorts orders by total price, most expensive first when `descending`.
pub fn sort_orders_by_price(orders: &mut [Order], descending: bool) {
    if descending {
        orders.sort_by(|a, b| b.total_price().cmp(&a.total_price()));
    } else {
        orders.sort_by_key(|order| order.total_price());
    }
}

/// Sorts customers by lifetime order count, busiest first when `descending`.
pub fn sort_customers_by_orders(customers: &mut [Customer], descending: bool) {
    if descending {
        customers.sort_by(|a, b| b.orders_count().cmp(&a.orders_count()));
    } else {
        customers.sort_by_key(|customer| customer.orders_count());
    }
}
