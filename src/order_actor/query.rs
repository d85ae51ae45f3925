//! Read-only views over the order collection.

use crate::model::{Order, OrderStatus};
use std::str::FromStr;

/// Which orders a query returns, and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    /// Orders awaiting review, oldest first (the staff work queue).
    Pending,
    /// Approved or rejected orders, newest first.
    Processed,
    /// Every order, newest first.
    All,
}

impl OrderFilter {
    /// Filters and sorts `orders`, which must be in insertion order.
    ///
    /// Sorting is stable, so orders with equal `created_at` keep their
    /// insertion order.
    pub fn apply(self, orders: Vec<Order>) -> Vec<Order> {
        match self {
            OrderFilter::Pending => orders
                .into_iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .collect(),
            OrderFilter::Processed => newest_first(
                orders
                    .into_iter()
                    .filter(|o| o.status.is_terminal())
                    .collect(),
            ),
            OrderFilter::All => newest_first(orders),
        }
    }
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

impl FromStr for OrderFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderFilter::Pending),
            "processed" => Ok(OrderFilter::Processed),
            "all" => Ok(OrderFilter::All),
            other => Err(format!("unknown order filter: {other}")),
        }
    }
}
