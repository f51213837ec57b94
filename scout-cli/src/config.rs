//! Process configuration from `SCOUT_*` environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `SCOUT_CHAT_URL` | `http://localhost:11434/api/chat` |
//! | `SCOUT_MODEL` | `llama3.2` |
//! | `SCOUT_EMBEDDER` | `ollama` (or `hashing`, fully offline) |
//! | `SCOUT_EMBED_URL` | `http://localhost:11434/api/embed` |
//! | `SCOUT_EMBED_MODEL` | `nomic-embed-text` |
//! | `SCOUT_EMBED_DIMENSIONS` | `768` for ollama, `384` for hashing |
//! | `SCOUT_PERSIST_DIR` | `developer_assistant_vectorstore` |
//! | `SCOUT_COLLECTION` | `developer_assistant` |
//! | `SCOUT_CACHE_DIR` | `knowledge_base` |
//! | `SCOUT_CHUNK_SIZE` / `SCOUT_CHUNK_OVERLAP` | `1000` / `200` |
//! | `SCOUT_TOP_K` | `5` |

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use scout_model::OllamaConfig;
use scout_rag::RagConfig;
use scout_rag::ollama::{DEFAULT_EMBED_MODEL, DEFAULT_EMBED_URL};
use scout_tool::DEFAULT_CACHE_DIR;

/// Which embedding provider backs the retrieval store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    Ollama,
    Hashing,
}

impl FromStr for EmbedderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "hashing" => Ok(Self::Hashing),
            other => bail!("unknown embedder '{other}', expected 'ollama' or 'hashing'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedderConfig {
    pub kind: EmbedderKind,
    pub url: String,
    pub model: String,
    pub dimensions: usize,
}

/// Everything the `scout` binary needs to wire the assistant together.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoutConfig {
    pub chat: OllamaConfig,
    pub embedder: EmbedderConfig,
    pub rag: RagConfig,
    pub cache_dir: PathBuf,
}

impl ScoutConfig {
    /// Read the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset or empty variables take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut chat = OllamaConfig::default();
        if let Some(url) = get("SCOUT_CHAT_URL") {
            chat = chat.with_chat_url(url);
        }
        if let Some(model) = get("SCOUT_MODEL") {
            chat = chat.with_model(model);
        }

        let kind = get("SCOUT_EMBEDDER")
            .map(|v| v.parse::<EmbedderKind>())
            .transpose()?
            .unwrap_or(EmbedderKind::Ollama);
        let default_dimensions = match kind {
            EmbedderKind::Ollama => 768,
            EmbedderKind::Hashing => 384,
        };
        let embedder = EmbedderConfig {
            kind,
            url: get("SCOUT_EMBED_URL").unwrap_or_else(|| DEFAULT_EMBED_URL.to_string()),
            model: get("SCOUT_EMBED_MODEL").unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string()),
            dimensions: parse(&get, "SCOUT_EMBED_DIMENSIONS")?.unwrap_or(default_dimensions),
        };

        let mut rag = RagConfig::builder();
        if let Some(dir) = get("SCOUT_PERSIST_DIR") {
            rag = rag.persist_directory(dir);
        }
        if let Some(collection) = get("SCOUT_COLLECTION") {
            rag = rag.collection(collection);
        }
        if let Some(size) = parse(&get, "SCOUT_CHUNK_SIZE")? {
            rag = rag.chunk_size(size);
        }
        if let Some(overlap) = parse(&get, "SCOUT_CHUNK_OVERLAP")? {
            rag = rag.chunk_overlap(overlap);
        }
        if let Some(top_k) = parse(&get, "SCOUT_TOP_K")? {
            rag = rag.top_k(top_k);
        }
        let rag = rag.build().context("invalid retrieval configuration")?;

        let cache_dir = get("SCOUT_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));

        Ok(Self { chat, embedder, rag, cache_dir })
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    get(key)
        .map(|raw| {
            raw.trim().parse::<T>().with_context(|| format!("{key}={raw} is not a valid number"))
        })
        .transpose()
}
