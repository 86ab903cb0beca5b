//! Top customers ranked by lifetime order count.

use common::CustomerId;
use domain::{Customer, Entity, sort_customers_by_orders};
use serde::Serialize;

use crate::report::Report;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRank {
    pub customer_id: Option<CustomerId>,
    pub name: String,
    pub email: String,
    pub orders_count: i64,
}

/// The first `n` customers by `orders_count` descending. Equal counts keep
/// their input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopCustomers {
    pub customers: Vec<CustomerRank>,
}

impl TopCustomers {
    pub fn from_customers(customers: &[Customer], n: usize) -> Self {
        let mut ranked = customers.to_vec();
        sort_customers_by_orders(&mut ranked, true);
        ranked.truncate(n);

        Self {
            customers: ranked
                .into_iter()
                .map(|c| CustomerRank {
                    customer_id: c.id(),
                    name: c.name().to_string(),
                    email: c.email().to_string(),
                    orders_count: c.orders_count(),
                })
                .collect(),
        }
    }
}

impl Report for TopCustomers {
    fn name(&self) -> &'static str {
        "TopCustomers"
    }

    fn len(&self) -> usize {
        self.customers.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn customer(id: i64, orders: i64) -> Customer {
        Customer::restore(
            CustomerId::new(id),
            format!("Customer {id}"),
            format!("c{id}@example.com"),
            "+79990000000",
            "",
            orders,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_ranks_descending_with_stable_ties() {
        let customers = vec![customer(1, 2), customer(2, 5), customer(3, 2), customer(4, 0)];

        let view = TopCustomers::from_customers(&customers, 3);

        let ids: Vec<i64> = view
            .customers
            .iter()
            .filter_map(|c| c.customer_id)
            .map(|id| id.get())
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(view.customers[0].orders_count, 5);
    }

    #[test]
    fn test_n_larger_than_input() {
        let view = TopCustomers::from_customers(&[customer(1, 1)], 10);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_zero_n_is_empty() {
        let view = TopCustomers::from_customers(&[customer(1, 1)], 0);
        assert!(view.is_empty());
    }
}
