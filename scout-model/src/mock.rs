//! Scripted chat model for tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use scout_core::{ChatModel, ChatRequest, ChatResponse, Message, ModelError, ToolCall};
use serde_json::Value;

type Scripted = Result<ChatResponse, ModelError>;

/// A [`ChatModel`] that replays queued replies in order and records every
/// request it receives.
///
/// Once the queue is empty the fallback reply is used; without a fallback the
/// call fails with [`ModelError::Transport`].
///
/// # Example
///
/// ```rust,ignore
/// let model = MockChatModel::new()
///     .with_tool_call("analyze_repository", json!({"repository_path": "/tmp"}))
///     .with_reply("The repository contains ...");
/// ```
#[derive(Default)]
pub struct MockChatModel {
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain text reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.push(Ok(ChatResponse::new(Message::assistant(content))))
    }

    /// Queue a reply that requests a single tool call.
    pub fn with_tool_call(self, name: impl Into<String>, arguments: Value) -> Self {
        let message = Message::assistant("").with_tool_calls(vec![ToolCall::new(name, arguments)]);
        self.push(Ok(ChatResponse::new(message)))
    }

    /// Queue an endpoint failure.
    pub fn with_status_error(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Err(ModelError::Status { status, body: body.into() }))
    }

    /// Reply used once the queue is exhausted.
    pub fn with_fallback(mut self, content: impl Into<String>) -> Self {
        self.fallback = Some(content.into());
        self
    }

    fn push(self, item: Scripted) -> Self {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).push_back(item);
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ModelError> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        let next = self.queue.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        match next {
            Some(scripted) => scripted,
            None => match &self.fallback {
                Some(content) => Ok(ChatResponse::new(Message::assistant(content.clone()))),
                None => Err(ModelError::Transport("mock model has no scripted reply".into())),
            },
        }
    }
}
