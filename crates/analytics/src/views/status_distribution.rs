//! Order counts per status.

use domain::{Order, OrderStatus};
use serde::Serialize;

use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

/// Counts of the statuses actually present, in order of first occurrence.
/// Absent statuses get no row.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusDistribution {
    pub statuses: Vec<StatusCount>,
}

impl StatusDistribution {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut statuses: Vec<StatusCount> = Vec::new();
        for order in orders {
            match statuses.iter_mut().find(|row| row.status == order.status()) {
                Some(row) => row.count += 1,
                None => statuses.push(StatusCount {
                    status: order.status(),
                    count: 1,
                }),
            }
        }
        Self { statuses }
    }

    /// Count for one status, zero if absent.
    pub fn count(&self, status: OrderStatus) -> usize {
        self.statuses
            .iter()
            .find(|row| row.status == status)
            .map_or(0, |row| row.count)
    }
}

impl Report for StatusDistribution {
    fn name(&self) -> &'static str {
        "StatusDistribution"
    }

    fn len(&self) -> usize {
        self.statuses.len()
    }
}
