//! Ollama client implementation.

use async_trait::async_trait;
use scout_core::{ChatModel, ChatRequest, ChatResponse, ModelError};
use tracing::{debug, error};

use super::config::OllamaConfig;
use super::wire::{WireChatRequest, WireChatResponse};

/// Client for an Ollama-compatible `/api/chat` endpoint.
pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] if the URL or model name is empty.
    pub fn new(config: OllamaConfig) -> Result<Self, ModelError> {
        if config.chat_url.trim().is_empty() {
            return Err(ModelError::Config("chat_url must not be empty".into()));
        }
        if config.model.trim().is_empty() {
            return Err(ModelError::Config("model must not be empty".into()));
        }
        Ok(Self { client: reqwest::Client::new(), config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ModelError> {
        debug!(
            model = %self.config.model,
            message_count = request.messages.len(),
            tool_count = request.tools.len(),
            "sending chat request"
        );

        let body = WireChatRequest::new(&self.config.model, &request);
        let response =
            self.client.post(&self.config.chat_url).json(&body).send().await.map_err(|e| {
                error!(url = %self.config.chat_url, error = %e, "chat request failed");
                ModelError::Transport(format!("request to {} failed: {e}", self.config.chat_url))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "chat endpoint returned an error");
            return Err(ModelError::Status { status: status.as_u16(), body });
        }

        let wire: WireChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse chat response");
            ModelError::Decode(format!("failed to parse chat response: {e}"))
        })?;

        let message = wire.into_message();
        debug!(
            content_len = message.content.len(),
            tool_calls = message.tool_calls.len(),
            "chat response received"
        );
        Ok(ChatResponse::new(message))
    }
}
