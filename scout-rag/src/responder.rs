//! Grounded answering over the retrieval store.

use std::sync::Arc;

use scout_core::{ChatModel, ChatRequest, Message};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::store::{QueryOutcome, RetrievalStore};

/// Reply the model gives when the retrieved context does not answer the question.
pub const NO_GROUNDED_ANSWER: &str = "no grounded answer";

/// Default system prompt for grounded answering.
pub const RAG_SYSTEM_PROMPT: &str = "You are a helpful retrieval assistant. \
Answer from the provided context only if the user message is relevant to it, \
and do not make anything up. If the message is not related to the retrieved context, \
or the context consists only of dummy documents (file_name dummy.txt), \
reply with exactly the string 'no grounded answer' and nothing else.";

/// Answers a message from retrieved context, or declines.
///
/// A decline is the exact [`NO_GROUNDED_ANSWER`] reply and surfaces as `None`
/// so the caller can fall back to ordinary chat.
pub struct RagResponder {
    store: Arc<RetrievalStore>,
    model: Arc<dyn ChatModel>,
    system_prompt: String,
}

impl RagResponder {
    pub fn new(store: Arc<RetrievalStore>, model: Arc<dyn ChatModel>) -> Self {
        Self { store, model, system_prompt: RAG_SYSTEM_PROMPT.to_string() }
    }

    /// Replace the system prompt. It must still instruct the model to reply
    /// with [`NO_GROUNDED_ANSWER`] when it declines.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Answer `message` from the `top_k` nearest chunks.
    ///
    /// Returns `Ok(None)` when retrieval is unavailable, nothing was
    /// retrieved, or the model declined.
    ///
    /// # Errors
    ///
    /// Propagates the chat model failure as [`RagError::Model`](crate::RagError::Model).
    pub async fn answer(&self, message: &str) -> Result<Option<String>> {
        let hits = match self.store.query(message, self.store.config().top_k).await {
            QueryOutcome::Unavailable => {
                debug!("retrieval unavailable, skipping grounded answer");
                return Ok(None);
            }
            QueryOutcome::Hits(hits) => hits,
        };

        if hits.is_empty() {
            info!("no documents retrieved");
            return Ok(None);
        }

        let context =
            hits.iter().map(|hit| hit.chunk.text.as_str()).collect::<Vec<_>>().join("\n\n");
        let request = ChatRequest::new(vec![
            Message::system(self.system_prompt.clone()),
            Message::user(grounded_prompt(&context, message)),
        ]);

        let response = self.model.chat(request).await?;
        Ok(interpret_reply(response.content()))
    }
}

/// The user turn sent alongside the retrieved context.
pub fn grounded_prompt(context: &str, question: &str) -> String {
    format!("Context: {context}\n\nQuestion: {question}\n\nAnswer:")
}

/// `None` if the reply is the sentinel (ignoring surrounding whitespace),
/// otherwise the reply verbatim.
pub fn interpret_reply(reply: &str) -> Option<String> {
    let trimmed = reply.trim();
    if trimmed == NO_GROUNDED_ANSWER {
        return None;
    }

    let normalized: String =
        trimmed.chars().filter(|c| !c.is_ascii_punctuation()).collect::<String>().to_lowercase();
    if !trimmed.is_empty() && normalized.trim() == NO_GROUNDED_ANSWER {
        warn!(
            reply = trimmed,
            "reply resembles the no-answer sentinel but does not match it exactly"
        );
    }
    Some(reply.to_string())
}
