//! Data types for documents, chunks, and search results.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Metadata key holding the full path of the source file.
pub const FILE_PATH: &str = "file_path";
/// Metadata key holding the file name of the source file.
pub const FILE_NAME: &str = "file_name";
/// Metadata key holding the file extension without the dot.
pub const DOC_TYPE: &str = "doc_type";

/// A source document containing text content and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
    /// Optional URI pointing to the original source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

impl Document {
    /// Build a document for a file loaded from disk, tagged with
    /// `file_path`, `file_name` and `doc_type`.
    pub fn from_file(path: &Path, text: String) -> Self {
        let file_path = path.to_string_lossy().to_string();
        let file_name =
            path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        let doc_type =
            path.extension().map(|e| e.to_string_lossy().to_string()).unwrap_or_default();

        let metadata = HashMap::from([
            (FILE_PATH.to_string(), file_path.clone()),
            (FILE_NAME.to_string(), file_name),
            (DOC_TYPE.to_string(), doc_type),
        ]);

        Self { id: file_path.clone(), text, metadata, source_uri: Some(file_path) }
    }

    /// Turn the whole document into a single chunk, without splitting.
    pub fn into_chunk(self) -> Chunk {
        Chunk {
            id: self.id.clone(),
            text: self.text,
            embedding: Vec::new(),
            metadata: self.metadata,
            document_id: self.id,
        }
    }
}

/// A segment of a [`Document`] with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Key-value metadata inherited from the parent document plus chunk-specific fields.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
