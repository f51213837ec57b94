// ── Ollama /api/chat request/response types ────────────────────────

use scout_core::{ChatRequest, Message, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
pub(super) struct WireChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    stream: bool,
}

impl<'a> WireChatRequest<'a> {
    pub(super) fn new(model: &'a str, request: &'a ChatRequest) -> Self {
        Self {
            model,
            messages: &request.messages,
            tools: request.tools.iter().map(|t| t.to_function_value()).collect(),
            stream: false,
        }
    }
}

#[derive(Deserialize)]
pub(super) struct WireChatResponse {
    #[serde(default)]
    message: Option<Message>,
}

impl WireChatResponse {
    /// A reply without a `message` object reads as an empty assistant turn.
    pub(super) fn into_message(self) -> Message {
        self.message.unwrap_or_else(|| Message::new(Role::Assistant, ""))
    }
}
