use super::CatalogItem;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of trailing characters shown to customers as the order reference.
const SHORT_ID_LEN: usize = 8;

/// Identifier of an [`Order`], e.g. `order-1718000000000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last eight characters, used in titles such as `Order #00012345 Placed`.
    pub fn short(&self) -> &str {
        match self.0.char_indices().rev().nth(SHORT_ID_LEN - 1) {
            Some((start, _)) => &self.0[start..],
            None => &self.0,
        }
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Order status. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Rejected => "REJECTED",
        })
    }
}

/// A catalog item frozen into an order together with its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float", alias = "price")]
    pub unit_price: Decimal,
    pub description: String,
    #[serde(alias = "image")]
    pub image_ref: String,
    pub quantity: u32,
}

impl OrderLine {
    pub fn from_item(item: &CatalogItem, quantity: u32) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            description: item.description.clone(),
            image_ref: item.image_ref.clone(),
            quantity,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// An `(item id, quantity)` pair as requested by a customer or staff member.
///
/// The quantity stays a raw number until the order factory has checked it is
/// a positive integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedItem {
    pub id: String,
    pub quantity: f64,
}

impl RequestedItem {
    pub fn new(id: impl Into<String>, quantity: impl Into<f64>) -> Self {
        Self {
            id: id.into(),
            quantity: quantity.into(),
        }
    }
}

/// Priced, validated lines ready to become an [`Order`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPayload {
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
}

/// A customer order.
///
/// `total` is fixed when the order is placed and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(alias = "items")]
    pub lines: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn short_id_is_the_last_eight_characters() {
        assert_eq!(OrderId::new("order-1718000012345").short(), "00012345");
        assert_eq!(OrderId::new("abc").short(), "abc");
    }

    #[test]
    fn status_uses_upper_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Approved).unwrap(),
            "\"APPROVED\""
        );
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn legacy_order_fields_are_accepted() {
        let json = r#"{
            "id": "order-1",
            "items": [{"id": "coffee-001", "name": "Espresso", "price": 3.5,
                       "image": "img", "description": "d", "quantity": 2}],
            "total": 7.0,
            "status": "PENDING",
            "timestamp": "2024-06-01T10:00:00.000Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.lines[0].unit_price, dec!(3.5));
        assert_eq!(order.lines[0].subtotal(), dec!(7.0));
        assert_eq!(order.tracking_number, None);

        let written = serde_json::to_value(&order).unwrap();
        assert!(written.get("lines").is_some());
        assert!(written.get("createdAt").is_some());
        assert!(written.get("trackingNumber").is_none());
    }
}
