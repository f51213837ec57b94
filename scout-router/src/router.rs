//! The per-turn dialogue state machine.

use std::path::PathBuf;
use std::sync::Arc;

use scout_core::{ChatModel, ChatRequest, Message, Tool, ToolCall, ToolDescriptor, error_payload};
use scout_rag::{FixedSizeChunker, Indexer, RagResponder, RetrievalStore};
use scout_tool::DEFAULT_CACHE_DIR;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::intent::{Intent, classify_intent, extract_directory_path};

/// Reply confirming a reset.
pub const RESET_REPLY: &str = "Reset the history and cleared stored data";

/// Reply confirming an index update.
pub const INDEX_UPDATED_REPLY: &str = "Rag vector store updated";

/// System prompt for plain conversation.
pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful assistant";

/// System prompt when the message names a directory and tools are offered.
pub const ANALYSIS_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that analyzes code, folders and repositories for their content";

/// Routes each user message to reset, indexing, grounded answering, plain
/// chat or a tool call, and returns the reply text.
///
/// # Example
///
/// ```rust,ignore
/// let router = DialogueRouter::new(model.clone(), store.clone())
///     .with_tool(Arc::new(RepoAnalyzer::new(model.clone())));
/// router.initialize().await;
///
/// let mut history = Vec::new();
/// let reply = router.handle_turn("what does /home/me/project do?", &mut history).await?;
/// ```
pub struct DialogueRouter {
    model: Arc<dyn ChatModel>,
    store: Arc<RetrievalStore>,
    indexer: Indexer,
    responder: RagResponder,
    tools: Vec<Arc<dyn Tool>>,
    cache_dir: PathBuf,
}

impl DialogueRouter {
    /// Create a router with no tools, chunking by the store's configured sizes.
    pub fn new(model: Arc<dyn ChatModel>, store: Arc<RetrievalStore>) -> Self {
        let config = store.config();
        let chunker = Arc::new(FixedSizeChunker::new(config.chunk_size, config.chunk_overlap));
        Self {
            indexer: Indexer::new(store.clone(), chunker),
            responder: RagResponder::new(store.clone(), model.clone()),
            model,
            store,
            tools: Vec::new(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }

    /// Register a tool. On a name clash the first registered tool wins.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Directory removed on reset. It should match the tools' cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Replace the grounded-answer responder, e.g. to change its system prompt.
    pub fn with_responder(mut self, responder: RagResponder) -> Self {
        self.responder = responder;
        self
    }

    pub fn store(&self) -> &Arc<RetrievalStore> {
        &self.store
    }

    /// Initialize the retrieval store. Returns whether retrieval is available.
    pub async fn initialize(&self) -> bool {
        self.store.initialize().await
    }

    /// Close the retrieval store.
    pub async fn shutdown(&self) {
        self.store.close().await;
    }

    /// Produce the reply to `message`.
    ///
    /// `history` holds the earlier turns; it is only modified by a reset,
    /// which clears it. Recording this turn is left to the caller.
    ///
    /// # Errors
    ///
    /// Chat endpoint and tool failures end the turn with an error.
    pub async fn handle_turn(&self, message: &str, history: &mut Vec<Message>) -> Result<String> {
        let directory = extract_directory_path(message);
        let intent = classify_intent(message, directory);
        debug!(?intent, "message classified");

        match intent {
            Intent::Reset => {
                self.reset(history).await;
                Ok(RESET_REPLY.to_string())
            }
            Intent::IndexUpdate(dir) => {
                let report = self.indexer.index(&dir).await;
                info!(
                    directory = %dir.display(),
                    chunks_added = report.chunks_added,
                    bootstrapped = report.bootstrapped,
                    "index update finished"
                );
                Ok(INDEX_UPDATED_REPLY.to_string())
            }
            Intent::DirectChat => {
                if let Some(answer) = self.responder.answer(message).await? {
                    info!("answered from retrieved context");
                    return Ok(answer);
                }
                self.direct_chat(message, history).await
            }
            Intent::ToolEligible(dir) => {
                if let Some(answer) = self.responder.answer(message).await? {
                    info!("answered from retrieved context");
                    return Ok(answer);
                }
                debug!(directory = %dir.display(), "offering tools");
                self.tool_chat(message, history).await
            }
        }
    }

    async fn reset(&self, history: &mut Vec<Message>) {
        history.clear();
        match tokio::fs::remove_dir_all(&self.cache_dir).await {
            Ok(()) => info!(cache_dir = %self.cache_dir.display(), "cache directory removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(cache_dir = %self.cache_dir.display(), "no cache directory to remove")
            }
            Err(e) => warn!(
                cache_dir = %self.cache_dir.display(),
                error = %e,
                "failed to remove cache directory"
            ),
        }
        self.store.reset().await;
    }

    async fn direct_chat(&self, message: &str, history: &[Message]) -> Result<String> {
        let request = ChatRequest::new(conversation(CHAT_SYSTEM_PROMPT, history, message));
        let response = self.model.chat(request).await?;
        Ok(response.content().to_string())
    }

    async fn tool_chat(&self, message: &str, history: &[Message]) -> Result<String> {
        let mut messages = conversation(ANALYSIS_SYSTEM_PROMPT, history, message);
        let descriptors: Vec<ToolDescriptor> =
            self.tools.iter().map(|tool| tool.descriptor().clone()).collect();

        let response =
            self.model.chat(ChatRequest::new(messages.clone()).with_tools(descriptors)).await?;
        let Some(call) = response.first_tool_call().cloned() else {
            return Ok(response.content().to_string());
        };

        if response.message.tool_calls.len() > 1 {
            warn!(
                requested = response.message.tool_calls.len(),
                "model requested several tool calls, running only the first"
            );
        }

        let result = self.run_tool(&call).await?;
        messages.push(Message::assistant("").with_tool_calls(vec![call]));
        messages.push(Message::tool(result.to_string()));

        let follow_up = self.model.chat(ChatRequest::new(messages)).await?;
        Ok(follow_up.content().to_string())
    }

    async fn run_tool(&self, call: &ToolCall) -> Result<Value> {
        let name = call.name();
        let Some(tool) = self.tools.iter().find(|tool| tool.name() == name) else {
            warn!(tool = name, "model requested an unknown tool");
            return Ok(error_payload(format!("Unknown tool: {name}")));
        };

        info!(tool = name, "invoking tool");
        let result = tool.invoke(Value::Object(call.arguments())).await?;
        Ok(result)
    }
}

fn conversation(system_prompt: &str, history: &[Message], message: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend_from_slice(history);
    messages.push(Message::user(message));
    messages
}
