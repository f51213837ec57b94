//! The remote chat model contract.

use async_trait::async_trait;

use crate::error::ModelError;
use crate::message::{Message, ToolCall};
use crate::tool::ToolDescriptor;

/// A non-streaming chat request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    /// Ordered conversation, system prompt first.
    pub messages: Vec<Message>,
    /// Tools the model may call. Empty means no tools are offered.
    pub tools: Vec<ToolDescriptor>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages, tools: Vec::new() }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDescriptor>) -> Self {
        self.tools = tools;
        self
    }
}

/// The model's reply to a [`ChatRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub message: Message,
}

impl ChatResponse {
    pub fn new(message: Message) -> Self {
        Self { message }
    }

    pub fn content(&self) -> &str {
        &self.message.content
    }

    /// The first requested tool call, if any. Further calls are ignored.
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.message.tool_calls.first()
    }
}

/// A chat endpoint able to answer a conversation, optionally with tool calls.
///
/// # Example
///
/// ```rust,ignore
/// use scout_core::{ChatModel, ChatRequest, Message};
///
/// let reply = model.chat(ChatRequest::new(vec![Message::user("hi")])).await?;
/// println!("{}", reply.content());
/// ```
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier sent with every request.
    fn name(&self) -> &str;

    /// Send one request and wait for the complete reply.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ModelError>;
}
