//! `scout`: an interactive developer assistant in the terminal.
//!
//! Reads one message per line from stdin and prints the reply. `exit` or
//! `quit` (or end of input) ends the session.

mod config;

use std::sync::Arc;

use anyhow::Context;
use scout_core::{ChatModel, Message};
use scout_model::OllamaClient;
use scout_rag::{
    EmbeddingProvider, HashingEmbeddingProvider, LocalVectorStore, OllamaEmbeddingProvider,
    RetrievalStore,
};
use scout_router::DialogueRouter;
use scout_router::intent::is_reset_request;
use scout_tool::RepoAnalyzer;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{EmbedderKind, ScoutConfig};

const GREETING: &str = "Woof! Woof! How can I assist you today?";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ScoutConfig::from_env().context("failed to load configuration")?;
    info!(
        model = %config.chat.model,
        chat_url = %config.chat.chat_url,
        embedder = ?config.embedder.kind,
        "starting scout"
    );

    let router = build_router(&config)?;
    if !router.initialize().await {
        warn!("retrieval store unavailable, grounded answers are disabled for this session");
    }

    let result = run_session(&router).await;
    router.shutdown().await;
    result
}

fn build_router(config: &ScoutConfig) -> anyhow::Result<DialogueRouter> {
    let client = OllamaClient::new(config.chat.clone())
        .context("invalid chat endpoint configuration")?;
    let model: Arc<dyn ChatModel> = Arc::new(client);

    let embedder: Arc<dyn EmbeddingProvider> = match config.embedder.kind {
        EmbedderKind::Ollama => Arc::new(
            OllamaEmbeddingProvider::new()
                .with_url(config.embedder.url.clone())
                .with_model(config.embedder.model.clone())
                .with_dimensions(config.embedder.dimensions),
        ),
        EmbedderKind::Hashing => {
            Arc::new(HashingEmbeddingProvider::new(config.embedder.dimensions))
        }
    };

    let store = Arc::new(
        RetrievalStore::builder()
            .config(config.rag.clone())
            .embedding_provider(embedder)
            .vector_store(Arc::new(LocalVectorStore::new(&config.rag.persist_directory)))
            .build()?,
    );

    let analyzer = RepoAnalyzer::new(model.clone()).with_cache_dir(&config.cache_dir);
    Ok(DialogueRouter::new(model, store)
        .with_tool(Arc::new(analyzer))
        .with_cache_dir(&config.cache_dir))
}

async fn run_session(router: &DialogueRouter) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history: Vec<Message> = Vec::new();

    print(&mut stdout, GREETING).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message.to_ascii_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        match router.handle_turn(message, &mut history).await {
            Ok(reply) => {
                print(&mut stdout, &reply).await?;
                record_turn(&mut history, message, reply);
            }
            Err(e) => print(&mut stdout, &format!("error: {e}")).await?,
        }
    }

    print(&mut stdout, "Goodbye!").await?;
    Ok(())
}

/// Append a completed turn. A reset turn is not recorded, so the history the
/// router cleared stays empty.
fn record_turn(history: &mut Vec<Message>, message: &str, reply: String) {
    if is_reset_request(message) {
        return;
    }
    history.push(Message::user(message));
    history.push(Message::assistant(reply));
}

async fn print(stdout: &mut tokio::io::Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n\n").await?;
    stdout.flush().await
}
