//! Configuration for the Ollama chat client.

/// Chat endpoint of a default local Ollama install.
pub const DEFAULT_CHAT_URL: &str = "http://localhost:11434/api/chat";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Endpoint and model for an [`OllamaClient`](super::OllamaClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Full URL of the chat endpoint.
    pub chat_url: String,
    /// Model name sent with every request.
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self { chat_url: DEFAULT_CHAT_URL.to_string(), model: DEFAULT_MODEL.to_string() }
    }
}

impl OllamaConfig {
    pub fn new(chat_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self { chat_url: chat_url.into(), model: model.into() }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_chat_url(mut self, chat_url: impl Into<String>) -> Self {
        self.chat_url = chat_url.into();
        self
    }
}
