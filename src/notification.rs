//! Customer-facing status messages derived from order transitions.
//!
//! [`status_message`] is a pure function of an order's current state.
//! [`spawn_status_feed`] turns the order actor's change events into SYSTEM
//! chat entries, one per created or transitioned order.

use crate::model::{Order, OrderId, OrderStatus, Sender};
use actor_framework::ResourceEvent;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLine {
    pub quantity: u32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

/// Structured status card for one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub severity: Severity,
    pub title: String,
    pub body: String,
    pub tracking_number: Option<String>,
    pub lines: Vec<StatusLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

pub fn status_message(order: &Order) -> StatusMessage {
    let short = order.id.short();
    let (severity, title, body) = match order.status {
        OrderStatus::Pending => (
            Severity::Pending,
            format!("Order #{short} Placed"),
            "We've received your order and it's waiting for admin approval.".to_string(),
        ),
        OrderStatus::Approved => {
            let mut body = "Great news! Your order is being prepared for delivery.".to_string();
            if let Some(tracking) = &order.tracking_number {
                body.push_str(&format!(" Tracking: {tracking}"));
            }
            (Severity::Success, format!("Order #{short} Approved!"), body)
        }
        OrderStatus::Rejected => (
            Severity::Error,
            format!("Order #{short} Rejected"),
            "We're sorry, but your order was rejected. Please contact support for more details."
                .to_string(),
        ),
    };

    StatusMessage {
        order_id: order.id.clone(),
        status: order.status,
        severity,
        title,
        body,
        tracking_number: order.tracking_number.clone(),
        lines: order
            .lines
            .iter()
            .map(|line| StatusLine {
                quantity: line.quantity,
                name: line.name.clone(),
                subtotal: line.subtotal(),
            })
            .collect(),
        total: order.total,
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.body)?;
        for line in &self.lines {
            writeln!(
                f,
                "  {} x {:<20} ${:.2}",
                line.quantity, line.name, line.subtotal
            )?;
        }
        write!(f, "  Total{:>22}", format!("${:.2}", self.total))
    }
}

/// A chat transcript entry carrying a status card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatEntry {
    pub sender: Sender,
    pub message: StatusMessage,
    pub timestamp: DateTime<Utc>,
}

/// Forwards a SYSTEM entry for every created or updated order.
///
/// Ends when the event stream closes or nobody listens any more.
pub fn spawn_status_feed(
    mut events: mpsc::UnboundedReceiver<ResourceEvent<Order>>,
    entries: mpsc::UnboundedSender<ChatEntry>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let Some(order) = event.entity() else {
                continue;
            };
            let entry = ChatEntry {
                sender: Sender::System,
                message: status_message(order),
                timestamp: Utc::now(),
            };
            if entries.send(entry).is_err() {
                debug!("Status feed has no listener, stopping");
                break;
            }
        }
    })
}
