//! Gemini function-calling adapter.
//!
//! The model is told about the menu through the system instruction and is
//! given a single tool, `place_order`. A function call in the reply becomes an
//! [`AssistantReply::Intent`]; otherwise the text parts become the reply.

use super::{Assistant, AssistantError, AssistantReply, IntentOperation, PLACE_ORDER};
use crate::catalog::Catalog;
use crate::config::AssistantConfig;
use crate::model::{ConversationTurn, RequestedItem, Role};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Gemini-backed assistant.
pub struct GeminiAssistant {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
    timeout: Duration,
    system_instruction: String,
}

impl GeminiAssistant {
    pub fn new(
        config: &AssistantConfig,
        api_key: impl Into<String>,
        cafe_name: &str,
        catalog: &Catalog,
    ) -> Result<Self, AssistantError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Http(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            timeout,
            system_instruction: system_instruction(cafe_name, catalog),
        })
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }

    fn build_request(&self, history: &[ConversationTurn], message: &str) -> GeminiRequest {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|turn| GeminiContent {
                role: match turn.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                },
                parts: vec![GeminiPart {
                    text: turn.text.clone(),
                }],
            })
            .collect();
        contents.push(GeminiContent {
            role: "user",
            parts: vec![GeminiPart {
                text: message.to_string(),
            }],
        });

        GeminiRequest {
            contents,
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: self.system_instruction.clone(),
                }],
            },
            tools: vec![GeminiTool {
                function_declarations: vec![place_order_declaration()],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
            },
        }
    }
}

/// The instructions the model follows, with the menu embedded as JSON.
pub fn system_instruction(cafe_name: &str, catalog: &Catalog) -> String {
    format!(
        "You are a friendly and efficient chatbot for {cafe_name}.\n\
         Your goal is to help customers browse the menu and place orders.\n\
         Be conversational and helpful. Do not make up items.\n\
         When a customer is ready to order, ask them to confirm.\n\
         Once they confirm, you MUST call the '{PLACE_ORDER}' function with the items they specified.\n\
         Do not call the function before the user confirms the order.\n\
         Calculate the total price yourself and tell the user before asking for confirmation. Prices are final.\n\
         \n\
         Here is the menu in JSON format:\n{}\n",
        catalog.menu_json()
    )
}

fn place_order_declaration() -> serde_json::Value {
    json!({
        "name": PLACE_ORDER,
        "description": "Places a customer's order with the items they have confirmed.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "items": {
                    "type": "ARRAY",
                    "description": "An array of items to order.",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "id": {
                                "type": "STRING",
                                "description": "The ID of the menu item, e.g., \"coffee-001\"."
                            },
                            "quantity": {
                                "type": "INTEGER",
                                "description": "The number of units for this item."
                            }
                        },
                        "required": ["id", "quantity"]
                    }
                }
            },
            "required": ["items"]
        }
    })
}

// Gemini API request/response structures

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: GeminiSystemInstruction,
    tools: Vec<GeminiTool>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct PlaceOrderArgs {
    items: Vec<RequestedItem>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[allow(dead_code)]
    code: Option<i32>,
}

/// Interprets a `generateContent` response body.
///
/// The first function call of the first candidate wins. Without one, the
/// candidate's text parts are concatenated; a reply with neither is an error.
fn parse_reply(body: &str) -> Result<AssistantReply, AssistantError> {
    let parsed: GeminiResponse =
        serde_json::from_str(body).map_err(|e| AssistantError::Serialization(e.to_string()))?;

    if let Some(error) = parsed.error {
        return Err(AssistantError::Response(format!(
            "Gemini API error: {}",
            error.message
        )));
    }

    let parts = parsed
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    let mut text = String::new();
    for part in parts {
        if let Some(call) = part.function_call {
            debug!(function = %call.name, "Function call received");
            if call.name != PLACE_ORDER {
                return Ok(AssistantReply::Intent(IntentOperation::Other { name: call.name }));
            }
            let args: PlaceOrderArgs = serde_json::from_value(call.args)
                .map_err(|e| AssistantError::Serialization(e.to_string()))?;
            return Ok(AssistantReply::place_order(args.items));
        }
        if let Some(t) = part.text {
            text.push_str(&t);
        }
    }

    if text.is_empty() {
        return Err(AssistantError::Response("No content in response".to_string()));
    }
    Ok(AssistantReply::Text(text))
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn send(
        &self,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<AssistantReply, AssistantError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = self.build_request(history, message);
        debug!(model = %self.model, turns = body.contents.len(), "Calling Gemini");

        let response = self
            .client
            .post(self.build_url())
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistantError::Timeout(self.timeout)
                } else {
                    AssistantError::Http(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AssistantError::Response(format!("HTTP {}: {}", status, text)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AssistantError::Http(e.to_string()))?;

        parse_reply(&text)
    }
}
