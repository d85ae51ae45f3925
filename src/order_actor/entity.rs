//! [`ActorEntity`] implementation for [`Order`].
//!
//! Transitions are validated before anything is written: not-pending first,
//! then the tracking number. A failed action therefore never leaves a
//! half-applied order behind.

use super::actions::{OrderAction, OrderUpdate};
use super::error::OrderError;
use crate::model::{Order, OrderId, OrderPayload, OrderStatus};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Payload for creating an order from already priced lines.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    payload: OrderPayload,
    status: OrderStatus,
    tracking_number: Option<String>,
    created_at: DateTime<Utc>,
}

impl OrderCreate {
    /// A customer order, awaiting staff review.
    pub fn pending(payload: OrderPayload) -> Self {
        Self {
            payload,
            status: OrderStatus::Pending,
            tracking_number: None,
            created_at: Utc::now(),
        }
    }

    /// A staff-entered order, confirmed on entry.
    pub fn approved(payload: OrderPayload, tracking_number: impl Into<String>) -> Self {
        Self {
            payload,
            status: OrderStatus::Approved,
            tracking_number: Some(tracking_number.into()),
            created_at: Utc::now(),
        }
    }

    pub fn payload(&self) -> &OrderPayload {
        &self.payload
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_number.as_deref()
    }
}

fn non_blank(tracking_number: &str) -> Option<String> {
    let trimmed = tracking_number.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = Order;
    type Context = ();
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.payload.lines.is_empty() {
            return Err(crate::order_factory::OrderFactoryError::EmptyOrder.into());
        }

        let tracking_number = match params.status {
            OrderStatus::Approved => Some(
                params
                    .tracking_number
                    .as_deref()
                    .and_then(non_blank)
                    .ok_or_else(|| OrderError::MissingTrackingNumber(id.clone()))?,
            ),
            _ => params.tracking_number,
        };

        Ok(Self {
            id,
            lines: params.payload.lines,
            total: params.payload.total,
            status: params.status,
            created_at: params.created_at,
            tracking_number,
        })
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), OrderError> {
        match update {}
    }

    /// Applies a status transition and returns the updated order.
    async fn handle_action(&mut self, action: OrderAction, _ctx: &()) -> Result<Order, OrderError> {
        if self.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: action.target(),
            });
        }

        match action {
            OrderAction::Approve { tracking_number } => {
                let tracking_number = non_blank(&tracking_number)
                    .ok_or_else(|| OrderError::MissingTrackingNumber(self.id.clone()))?;
                self.status = OrderStatus::Approved;
                self.tracking_number = Some(tracking_number);
            }
            OrderAction::Reject => {
                self.status = OrderStatus::Rejected;
            }
        }
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::model::RequestedItem;
    use crate::order_factory::build_order;

    fn payload() -> OrderPayload {
        build_order(&Catalog::default(), &[RequestedItem::new("coffee-001", 1)]).unwrap()
    }

    fn pending_order() -> Order {
        Order::from_create_params(OrderId::new("order-1"), OrderCreate::pending(payload())).unwrap()
    }

    #[tokio::test]
    async fn approve_sets_status_and_tracking() {
        let mut order = pending_order();
        let updated = order
            .handle_action(
                OrderAction::Approve {
                    tracking_number: " TRK1 ".into(),
                },
                &(),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Approved);
        assert_eq!(updated.tracking_number.as_deref(), Some("TRK1"));
    }

    #[tokio::test]
    async fn blank_tracking_is_rejected_before_mutation() {
        let mut order = pending_order();
        let err = order
            .handle_action(
                OrderAction::Approve {
                    tracking_number: "   ".into(),
                },
                &(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, OrderError::MissingTrackingNumber(OrderId::new("order-1")));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn terminal_orders_cannot_transition() {
        let mut order = pending_order();
        order.handle_action(OrderAction::Reject, &()).await.unwrap();

        let err = order
            .handle_action(
                OrderAction::Approve {
                    tracking_number: "TRK".into(),
                },
                &(),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition {
                id: OrderId::new("order-1"),
                from: OrderStatus::Rejected,
                to: OrderStatus::Approved,
            }
        );
    }

    #[test]
    fn approved_creation_requires_tracking() {
        let err = Order::from_create_params(
            OrderId::new("order-2"),
            OrderCreate::approved(payload(), ""),
        )
        .unwrap_err();
        assert_eq!(err, OrderError::MissingTrackingNumber(OrderId::new("order-2")));
    }

    #[test]
    fn empty_payload_is_refused() {
        let empty = OrderPayload {
            lines: Vec::new(),
            total: rust_decimal::Decimal::ZERO,
        };
        assert!(matches!(
            Order::from_create_params(OrderId::new("order-3"), OrderCreate::pending(empty)),
            Err(OrderError::InvalidOrder(_))
        ));
    }
}
