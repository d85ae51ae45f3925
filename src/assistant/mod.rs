//! The external conversational assistant.
//!
//! An [`Assistant`] receives the prior history plus the new customer message
//! and answers with an [`AssistantReply`]: either free text or a structured
//! intent. [`gemini::GeminiAssistant`] talks to the Gemini API over HTTP;
//! [`mock::ScriptedAssistant`] replays canned replies in tests.

pub mod gemini;
pub mod mock;

use crate::model::{ConversationTurn, RequestedItem};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Name of the only operation the assistant may invoke.
pub const PLACE_ORDER: &str = "place_order";

/// Failures talking to the assistant. The session never surfaces these.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Response error: {0}")]
    Response(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Assistant did not answer within {0:?}")]
    Timeout(Duration),
}

/// What the assistant answered.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantReply {
    Text(String),
    Intent(IntentOperation),
}

/// A structured instruction returned instead of text.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOperation {
    PlaceOrder { items: Vec<RequestedItem> },
    /// An operation this system does not know.
    Other { name: String },
}

impl AssistantReply {
    pub fn text(text: impl Into<String>) -> Self {
        AssistantReply::Text(text.into())
    }

    pub fn place_order(items: Vec<RequestedItem>) -> Self {
        AssistantReply::Intent(IntentOperation::PlaceOrder { items })
    }
}

#[async_trait]
pub trait Assistant: Send + Sync {
    /// Sends `message` with the turns that preceded it.
    ///
    /// `history` does not contain `message` itself.
    async fn send(
        &self,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<AssistantReply, AssistantError>;
}
