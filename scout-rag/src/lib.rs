//! # scout-rag
//!
//! Retrieval for the Scout assistant.
//!
//! - [`RetrievalStore`] - the owned, persistent collection of embedded chunks
//!   with its initialize / add / query / reset / close lifecycle
//! - [`Indexer`] - loads a directory of source files into the store
//! - [`RagResponder`] - answers from retrieved context, or declines with the
//!   [`NO_GROUNDED_ANSWER`] sentinel
//!
//! Embedding models and vector engines stay pluggable behind
//! [`EmbeddingProvider`] and [`VectorStore`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scout_rag::{HashingEmbeddingProvider, LocalVectorStore, RagConfig, RetrievalStore};
//!
//! let config = RagConfig::default();
//! let store = Arc::new(
//!     RetrievalStore::builder()
//!         .vector_store(Arc::new(LocalVectorStore::new(&config.persist_directory)))
//!         .embedding_provider(Arc::new(HashingEmbeddingProvider::default()))
//!         .config(config)
//!         .build()?,
//! );
//! store.initialize().await;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod hashing;
pub mod indexer;
pub mod inmemory;
pub mod local;
#[cfg(feature = "ollama")]
pub mod ollama;
pub mod responder;
pub mod store;
pub mod vectorstore;

pub use chunking::{Chunker, FixedSizeChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use hashing::HashingEmbeddingProvider;
pub use indexer::{IndexReport, Indexer};
pub use inmemory::InMemoryVectorStore;
pub use local::LocalVectorStore;
#[cfg(feature = "ollama")]
pub use ollama::OllamaEmbeddingProvider;
pub use responder::{NO_GROUNDED_ANSWER, RagResponder};
pub use store::{QueryOutcome, RetrievalStore, RetrievalStoreBuilder};
pub use vectorstore::VectorStore;
