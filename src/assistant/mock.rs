//! A scripted [`Assistant`] for tests and offline runs.
//!
//! Replies are queued up front and handed out in order; every call is recorded
//! so tests can assert on the history the session sent.
//!
//! ```rust
//! use cafe_orders::assistant::mock::ScriptedAssistant;
//! use cafe_orders::assistant::{Assistant, AssistantReply};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let assistant = ScriptedAssistant::new();
//! assistant.push_text("We have espresso and croissants.");
//!
//! let reply = assistant.send(&[], "What do you have?").await.unwrap();
//! assert_eq!(reply, AssistantReply::text("We have espresso and croissants."));
//! assert_eq!(assistant.calls()[0].message, "What do you have?");
//! # }
//! ```

use super::{Assistant, AssistantError, AssistantReply};
use crate::model::{ConversationTurn, RequestedItem};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One recorded invocation of [`Assistant::send`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub history: Vec<ConversationTurn>,
    pub message: String,
}

enum Scripted {
    Reply(Result<AssistantReply, AssistantError>),
    /// Never answers; for exercising timeouts.
    Hang,
}

#[derive(Default)]
pub struct ScriptedAssistant {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(Scripted::Reply(Ok(AssistantReply::text(text))));
    }

    pub fn push_place_order(&self, items: Vec<RequestedItem>) {
        self.push(Scripted::Reply(Ok(AssistantReply::place_order(items))));
    }

    pub fn push_reply(&self, reply: AssistantReply) {
        self.push(Scripted::Reply(Ok(reply)));
    }

    pub fn push_error(&self, error: AssistantError) {
        self.push(Scripted::Reply(Err(error)));
    }

    pub fn push_hang(&self) {
        self.push(Scripted::Hang);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, step: Scripted) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(step);
        }
    }
}

#[async_trait]
impl Assistant for ScriptedAssistant {
    async fn send(
        &self,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<AssistantReply, AssistantError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                history: history.to_vec(),
                message: message.to_string(),
            });
        }

        let step = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match step {
            Some(Scripted::Reply(reply)) => reply,
            Some(Scripted::Hang) => {
                // Sleep far beyond any test timeout.
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AssistantError::Timeout(Duration::from_secs(3600)))
            }
            None => Err(AssistantError::Response("no scripted reply left".to_string())),
        }
    }
}
