//! Sales by date: revenue and items per calendar day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use domain::{Entity, Money, Order};
use serde::Serialize;

use crate::report::Report;

/// Totals for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub total: Money,
    pub items: i64,
}

/// Orders grouped by creation date, oldest day first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SalesByDate {
    pub days: Vec<DailySales>,
}

impl SalesByDate {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut by_day: BTreeMap<NaiveDate, (Money, i64)> = BTreeMap::new();
        for order in orders {
            let entry = by_day
                .entry(order.created_at().date_naive())
                .or_insert((Money::zero(), 0));
            entry.0 += order.total_price();
            entry.1 += order.items_count();
        }

        Self {
            days: by_day
                .into_iter()
                .map(|(date, (total, items))| DailySales { date, total, items })
                .collect(),
        }
    }

    /// Sum of revenue over all days.
    pub fn total_revenue(&self) -> Money {
        self.days.iter().map(|day| day.total).sum()
    }
}

impl Report for SalesByDate {
    fn name(&self) -> &'static str {
        "SalesByDate"
    }

    fn len(&self) -> usize {
        self.days.len()
    }
}
