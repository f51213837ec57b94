//! Ollama chat provider.
//!
//! Talks to `POST /api/chat` with `stream: false`. Tool descriptors are sent
//! in the `{"type": "function", "function": {...}}` envelope and tool calls
//! come back under `message.tool_calls`.

mod client;
mod config;
mod wire;

pub use client::OllamaClient;
pub use config::{DEFAULT_CHAT_URL, DEFAULT_MODEL, OllamaConfig};
