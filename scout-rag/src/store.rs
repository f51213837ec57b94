//! The retrieval store: an owned, persistent collection of embedded chunks.
//!
//! [`RetrievalStore`] composes an [`EmbeddingProvider`] and a [`VectorStore`]
//! engine and adds the lifecycle the assistant relies on:
//!
//! - [`initialize`](RetrievalStore::initialize) creates the collection with a
//!   placeholder (bounded retry) or loads the persisted one
//! - [`add`](RetrievalStore::add) appends chunks, never deduplicating
//! - [`query`](RetrievalStore::query) returns nearest chunks or
//!   [`QueryOutcome::Unavailable`]
//! - [`reset`](RetrievalStore::reset) leaves exactly the two canonical dummies
//! - [`close`](RetrievalStore::close) releases the engine
//!
//! Once initialized the collection is never empty: mutations hold the write
//! side of an internal lock for their whole duration, so a reader cannot
//! observe the gap between "delete everything" and "insert dummies".
//!
//! # Example
//!
//! ```rust,ignore
//! let store = RetrievalStore::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(HashingEmbeddingProvider::default()))
//!     .vector_store(Arc::new(LocalVectorStore::new("developer_assistant_vectorstore")))
//!     .build()?;
//!
//! if store.initialize().await {
//!     let outcome = store.query("how is the index reset?", 5).await;
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::RagConfig;
use crate::document::{Chunk, DOC_TYPE, Document, FILE_NAME, FILE_PATH, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Text of the document seeded into a freshly created store.
pub const PLACEHOLDER_TEXT: &str = "This is a dummy document for initialization purposes.";

/// `file_name` of the placeholder document.
pub const PLACEHOLDER_FILE_NAME: &str = "dummy.txt";

/// Texts and `source` tags inserted by [`RetrievalStore::reset`].
pub const RESET_DUMMIES: [(&str, &str); 2] =
    [("This is a dummy document.", "dummy1"), ("Another dummy document.", "dummy2")];

/// Result of a [`RetrievalStore::query`].
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The store is not initialized, or the lookup itself failed.
    Unavailable,
    /// Nearest chunks, most similar first.
    Hits(Vec<SearchResult>),
}

impl QueryOutcome {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// The hits, or `None` when retrieval was unavailable.
    pub fn into_hits(self) -> Option<Vec<SearchResult>> {
        match self {
            Self::Unavailable => None,
            Self::Hits(hits) => Some(hits),
        }
    }
}

/// Persistent, similarity-searchable collection of embedded chunks.
///
/// Construct one via [`RetrievalStore::builder()`]. A store starts
/// uninitialized; every operation on an uninitialized (or closed) store is a
/// logged no-op or reports unavailability, never a panic.
pub struct RetrievalStore {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    engine: Arc<dyn VectorStore>,
    active: RwLock<Option<Arc<dyn VectorStore>>>,
}

impl RetrievalStore {
    /// Create a new [`RetrievalStoreBuilder`].
    pub fn builder() -> RetrievalStoreBuilder {
        RetrievalStoreBuilder::default()
    }

    /// Return a reference to the store configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Whether the store is initialized and usable.
    pub async fn is_available(&self) -> bool {
        self.active.read().await.is_some()
    }

    /// Create or load the collection.
    ///
    /// If the persist directory is absent, a new collection is created and
    /// seeded with one placeholder document, retrying up to
    /// `retry_attempts` times with `retry_delay` in between. If it is present,
    /// the persisted collection is loaded (and reseeded if found empty).
    ///
    /// Returns whether the store is available afterwards. Failure is logged
    /// and leaves the store unavailable; it is never fatal.
    pub async fn initialize(&self) -> bool {
        let mut active = self.active.write().await;
        if active.is_some() {
            return true;
        }

        let directory = &self.config.persist_directory;
        let collection = self.config.collection.as_str();

        if directory.exists() {
            return match self.open_existing().await {
                Ok(chunk_count) => {
                    info!(
                        collection,
                        chunk_count,
                        directory = %directory.display(),
                        "vector store loaded"
                    );
                    *active = Some(self.engine.clone());
                    true
                }
                Err(e) => {
                    error!(collection, error = %e, "failed to load vector store");
                    false
                }
            };
        }

        let attempts = self.config.retry_attempts;
        for attempt in 1..=attempts {
            match self.create_with_placeholder().await {
                Ok(()) => {
                    info!(
                        collection,
                        directory = %directory.display(),
                        "vector store initialized with a placeholder document"
                    );
                    *active = Some(self.engine.clone());
                    return true;
                }
                Err(e) if attempt < attempts => {
                    warn!(collection, attempt, error = %e, "retrying vector store initialization");
                    tokio::time::sleep(self.config.retry_delay()).await;
                }
                Err(e) => {
                    error!(collection, attempts, error = %e, "failed to initialize vector store");
                }
            }
        }
        false
    }

    async fn create_with_placeholder(&self) -> Result<()> {
        self.engine
            .create_collection(&self.config.collection, self.embedding_provider.dimensions())
            .await?;
        self.insert(self.engine.as_ref(), vec![placeholder_chunk()]).await?;
        Ok(())
    }

    async fn open_existing(&self) -> Result<usize> {
        let collection = &self.config.collection;
        self.engine.create_collection(collection, self.embedding_provider.dimensions()).await?;
        let existing = self.engine.list(collection).await?.len();
        if existing > 0 {
            return Ok(existing);
        }
        warn!(collection = %collection, "persisted collection is empty, reseeding placeholder");
        self.insert(self.engine.as_ref(), vec![placeholder_chunk()]).await
    }

    /// Embed chunks and upsert them under fresh IDs. Returns how many were stored.
    async fn insert(&self, engine: &dyn VectorStore, mut chunks: Vec<Chunk>) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::EmbeddingError {
                provider: "store".to_string(),
                message: format!(
                    "expected {} embeddings, got {}",
                    chunks.len(),
                    embeddings.len()
                ),
            });
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.id = Uuid::new_v4().to_string();
            chunk.embedding = embedding;
        }

        engine.upsert(&self.config.collection, &chunks).await?;
        Ok(chunks.len())
    }

    /// Embed and append chunks.
    ///
    /// Every chunk gets a fresh ID, so adding the same content twice stores
    /// it twice.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::StoreUnavailable`] if the store is not initialized,
    /// or the embedding/engine error.
    pub async fn add(&self, chunks: Vec<Chunk>) -> Result<usize> {
        let active = self.active.write().await;
        let engine = active.as_ref().ok_or(RagError::StoreUnavailable)?;
        let added = self.insert(engine.as_ref(), chunks).await?;
        info!(
            collection = %self.config.collection,
            chunk_count = added,
            "chunks added to vector store"
        );
        Ok(added)
    }

    /// Return the `k` chunks nearest to `text`.
    ///
    /// Never fails: an uninitialized store, or an embedding/search error
    /// (logged), yields [`QueryOutcome::Unavailable`].
    pub async fn query(&self, text: &str, k: usize) -> QueryOutcome {
        let active = self.active.read().await;
        let Some(engine) = active.as_ref() else {
            warn!("query on uninitialized vector store");
            return QueryOutcome::Unavailable;
        };

        let embedding = match self.embedding_provider.embed(text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                error!(error = %e, "embedding failed during query");
                return QueryOutcome::Unavailable;
            }
        };

        match engine.search(&self.config.collection, &embedding, k).await {
            Ok(hits) => {
                info!(result_count = hits.len(), "query completed");
                QueryOutcome::Hits(hits)
            }
            Err(e) => {
                error!(
                    collection = %self.config.collection,
                    error = %e,
                    "vector store search failed"
                );
                QueryOutcome::Unavailable
            }
        }
    }

    /// Every stored chunk. Empty when the store is unavailable.
    pub async fn list(&self) -> Vec<Chunk> {
        let active = self.active.read().await;
        let Some(engine) = active.as_ref() else {
            return Vec::new();
        };
        engine.list(&self.config.collection).await.unwrap_or_else(|e| {
            error!(error = %e, "failed to list vector store");
            Vec::new()
        })
    }

    /// Delete every entry, then insert the two [`RESET_DUMMIES`].
    ///
    /// Idempotent and best effort: errors are logged, never returned. A no-op
    /// on an uninitialized store.
    pub async fn reset(&self) {
        let active = self.active.write().await;
        let Some(engine) = active.as_ref() else {
            warn!("reset requested but vector store is not initialized");
            return;
        };

        if let Err(e) = self.purge_and_reseed(engine.as_ref()).await {
            error!(
                collection = %self.config.collection,
                error = %e,
                "error resetting vector store"
            );
        }
    }

    async fn purge_and_reseed(&self, engine: &dyn VectorStore) -> Result<()> {
        let collection = &self.config.collection;
        let existing = engine.list(collection).await?;
        if existing.is_empty() {
            info!(collection = %collection, "no vectors found to delete");
        } else {
            let ids: Vec<&str> = existing.iter().map(|c| c.id.as_str()).collect();
            engine.delete(collection, &ids).await?;
            info!(collection = %collection, deleted = ids.len(), "all vectors deleted");
        }

        let dummies = RESET_DUMMIES
            .iter()
            .map(|(text, source)| {
                Chunk {
                    id: String::new(),
                    text: (*text).to_string(),
                    embedding: Vec::new(),
                    metadata: HashMap::from([("source".to_string(), (*source).to_string())]),
                    document_id: (*source).to_string(),
                }
            })
            .collect();
        self.insert(engine, dummies).await?;
        info!(collection = %collection, "dummy data added");
        Ok(())
    }

    /// Release the engine. The store is unavailable afterwards until
    /// [`initialize`](Self::initialize) is called again. Safe to call twice.
    pub async fn close(&self) {
        let mut active = self.active.write().await;
        let Some(engine) = active.take() else {
            return;
        };
        match engine.close().await {
            Ok(()) => info!("vector store closed"),
            Err(e) => error!(error = %e, "error closing vector store"),
        }
    }
}

fn placeholder_chunk() -> Chunk {
    let mut document = Document::from_file(
        std::path::Path::new("/dummy/path"),
        PLACEHOLDER_TEXT.to_string(),
    );
    document.metadata.insert(FILE_NAME.to_string(), PLACEHOLDER_FILE_NAME.to_string());
    document.metadata.insert(FILE_PATH.to_string(), "/dummy/path".to_string());
    document.metadata.insert(DOC_TYPE.to_string(), "txt".to_string());
    document.into_chunk()
}

/// Builder for constructing a [`RetrievalStore`].
///
/// `embedding_provider` and `vector_store` are required; `config` defaults
/// to [`RagConfig::default()`].
#[derive(Default)]
pub struct RetrievalStoreBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
}

impl RetrievalStoreBuilder {
    /// Set the store configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store engine.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Build the [`RetrievalStore`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RetrievalStore> {
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let engine = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;

        Ok(RetrievalStore {
            config: self.config.unwrap_or_default(),
            embedding_provider,
            engine,
            active: RwLock::new(None),
        })
    }
}
