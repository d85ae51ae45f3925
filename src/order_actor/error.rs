//! Error types for the Order actor.

use crate::model::{OrderId, OrderStatus};
use crate::order_factory::OrderFactoryError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The order is not in a state that allows the requested transition.
    #[error("Order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Approval requires a non-blank tracking number.
    #[error("Order {0} needs a tracking number to be approved")]
    MissingTrackingNumber(OrderId),

    /// The requested items could not be turned into an order.
    #[error(transparent)]
    InvalidOrder(#[from] OrderFactoryError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
