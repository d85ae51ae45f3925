//! One customer's conversation with the assistant.
//!
//! [`ConversationSession`] owns the turn history and is its only mutator. Each
//! call to [`ConversationSession::handle_user_message`] appends the user turn,
//! asks the assistant, and then appends exactly one assistant turn on success
//! (the reply text, or a synthetic summary of an order attempt). When the
//! assistant itself fails, only the user turn is kept so that a retry re-sends
//! full context.

use crate::assistant::{Assistant, AssistantError, AssistantReply, IntentOperation};
use crate::clients::OrderClient;
use crate::model::{ConversationTurn, Order, RequestedItem, Sender};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

pub const APOLOGY: &str = "I'm sorry, I'm having a little trouble right now. Please try again later.";
pub const ORDER_FAILED: &str =
    "I'm sorry, there was an error processing your order items. Please try again.";
const ORDER_PLACED_TURN: &str = "Order placed successfully. System will notify user.";
const ORDER_FAILED_TURN: &str = "Error processing order.";

/// What to show the customer after a message.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReply {
    pub display_text: String,
    pub sender: Sender,
    /// Items the assistant asked to order, if it returned a place-order intent.
    pub intent: Option<Vec<RequestedItem>>,
    /// The order created from that intent.
    pub order: Option<Order>,
}

impl SessionReply {
    fn bot(text: impl Into<String>) -> Self {
        Self {
            display_text: text.into(),
            sender: Sender::Bot,
            intent: None,
            order: None,
        }
    }
}

pub struct ConversationSession {
    assistant: Arc<dyn Assistant>,
    orders: OrderClient,
    history: Vec<ConversationTurn>,
    timeout: Duration,
    greeting: String,
}

impl ConversationSession {
    pub fn new(
        assistant: Arc<dyn Assistant>,
        orders: OrderClient,
        timeout: Duration,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            assistant,
            orders,
            history: Vec::new(),
            timeout,
            greeting: greeting.into(),
        }
    }

    /// The welcome line shown when the chat opens. Never sent to the assistant.
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Handles one customer message. Never fails: every problem becomes a reply.
    #[instrument(skip_all)]
    pub async fn handle_user_message(&mut self, text: &str) -> SessionReply {
        let prior = self.history.clone();
        self.history.push(ConversationTurn::user(text));

        let reply = match self.ask(&prior, text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Assistant call failed");
                return SessionReply::bot(APOLOGY);
            }
        };

        match reply {
            AssistantReply::Text(text) if text.trim().is_empty() => {
                warn!("Assistant returned an empty reply");
                SessionReply::bot(APOLOGY)
            }
            AssistantReply::Text(text) => {
                self.history.push(ConversationTurn::assistant(text.clone()));
                SessionReply::bot(text)
            }
            AssistantReply::Intent(IntentOperation::PlaceOrder { items }) => {
                self.place_order(items).await
            }
            AssistantReply::Intent(IntentOperation::Other { name }) => {
                warn!(operation = %name, "Assistant requested an unknown operation");
                SessionReply::bot(APOLOGY)
            }
        }
    }

    async fn ask(
        &self,
        prior: &[ConversationTurn],
        text: &str,
    ) -> Result<AssistantReply, AssistantError> {
        tokio::time::timeout(self.timeout, self.assistant.send(prior, text))
            .await
            .map_err(|_| AssistantError::Timeout(self.timeout))?
    }

    async fn place_order(&mut self, items: Vec<RequestedItem>) -> SessionReply {
        match self.orders.place_order(&items).await {
            Ok(order) => {
                info!(order_id = %order.id, "Order placed from conversation");
                self.history.push(ConversationTurn::assistant(ORDER_PLACED_TURN));
                SessionReply {
                    display_text: format!(
                        "Order #{} has been placed! You'll be notified once the admin approves it for delivery.",
                        order.id.short()
                    ),
                    sender: Sender::System,
                    intent: Some(items),
                    order: Some(order),
                }
            }
            Err(e) => {
                warn!(error = %e, "Order from conversation was not created");
                self.history.push(ConversationTurn::assistant(ORDER_FAILED_TURN));
                SessionReply {
                    intent: Some(items),
                    ..SessionReply::bot(ORDER_FAILED)
                }
            }
        }
    }
}
