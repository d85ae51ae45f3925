//! Turns requested `(item id, quantity)` pairs into a priced order payload.
//!
//! [`build_order`] is pure: it reads the catalog and nothing else, so the
//! conversational path and the staff manual-entry path share it.

use crate::catalog::Catalog;
use crate::model::{OrderLine, OrderPayload, RequestedItem};
use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures while building an order. No order is created.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderFactoryError {
    #[error("Invalid menu item ID: {0}")]
    InvalidItem(String),

    #[error("Invalid quantity {quantity} for item {id}")]
    InvalidQuantity { id: String, quantity: f64 },

    #[error("Order contains no items")]
    EmptyOrder,
}

/// Resolves every requested item against the catalog and prices the order.
///
/// Lines keep the input order and repeated ids stay separate lines. Entries
/// are checked one by one, so the first offending entry is the one reported.
pub fn build_order(
    catalog: &Catalog,
    requested: &[RequestedItem],
) -> Result<OrderPayload, OrderFactoryError> {
    if requested.is_empty() {
        return Err(OrderFactoryError::EmptyOrder);
    }

    let mut lines = Vec::with_capacity(requested.len());
    let mut total = Decimal::ZERO;
    for entry in requested {
        let item = catalog
            .lookup(&entry.id)
            .ok_or_else(|| OrderFactoryError::InvalidItem(entry.id.clone()))?;
        let quantity = whole_quantity(entry.quantity).ok_or_else(|| {
            OrderFactoryError::InvalidQuantity {
                id: entry.id.clone(),
                quantity: entry.quantity,
            }
        })?;

        let line = OrderLine::from_item(item, quantity);
        total += line.subtotal();
        lines.push(line);
    }

    Ok(OrderPayload { lines, total })
}

fn whole_quantity(raw: f64) -> Option<u32> {
    if raw.is_finite() && raw.fract() == 0.0 && raw >= 1.0 && raw <= f64::from(u32::MAX) {
        Some(raw as u32)
    } else {
        None
    }
}
