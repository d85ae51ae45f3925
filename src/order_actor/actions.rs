//! Custom actions for the Order actor.
//!
//! The order state machine has exactly two edges, both leaving `Pending`.
//! They are handled by [`ActorEntity::handle_action`](actor_framework::ActorEntity::handle_action)
//! on [`Order`](crate::model::Order).

use crate::model::OrderStatus;

/// Status transitions that can be requested for an order.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// `Pending -> Approved`, recording where the delivery can be tracked.
    ///
    /// # Errors
    /// Fails if the order is not pending or the tracking number is blank.
    Approve { tracking_number: String },
    /// `Pending -> Rejected`.
    Reject,
}

impl OrderAction {
    /// The status this action moves an order into.
    pub fn target(&self) -> OrderStatus {
        match self {
            OrderAction::Approve { .. } => OrderStatus::Approved,
            OrderAction::Reject => OrderStatus::Rejected,
        }
    }
}

/// Orders have no free-form updates; status only changes through [`OrderAction`].
#[derive(Debug)]
pub enum OrderUpdate {}
