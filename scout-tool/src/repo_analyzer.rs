//! Repository analysis tool.
//!
//! [`RepoAnalyzer`] reads every source file of a local repository, appends
//! the aggregated text to a cache file under the knowledge-base directory and
//! asks the chat model for a structural summary.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scout_tool::RepoAnalyzer;
//!
//! let analyzer = RepoAnalyzer::new(model.clone()).with_cache_dir("knowledge_base");
//! let result = analyzer.invoke(json!({"repository_path": "/home/me/project"})).await?;
//! // {"repository_path": "/home/me/project", "summary": "..."}
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use scout_core::files::collect_source_files;
use scout_core::{ChatModel, ChatRequest, Message, Tool, ToolDescriptor, ToolError, error_payload};
use serde_json::{Value, json};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Where aggregated repository text is cached by default.
pub const DEFAULT_CACHE_DIR: &str = "knowledge_base";

const TOOL_NAME: &str = "analyze_repository";

const INVALID_PATH: &str = "Invalid or non-existent repository path provided.";

const ANALYSIS_SYSTEM_PROMPT: &str = "You are a helpful assistant. Use all the given tools";

/// Summarizes a local repository with the chat model.
pub struct RepoAnalyzer {
    model: Arc<dyn ChatModel>,
    cache_dir: PathBuf,
    descriptor: ToolDescriptor,
}

impl RepoAnalyzer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        let descriptor = ToolDescriptor::new(
            TOOL_NAME,
            "Analyze a repository given a valid directory path. \
             This tool should only be invoked when the user explicitly mentions \
             analyzing a repository or provides a directory path for code analysis.",
            json!({
                "type": "object",
                "properties": {
                    "repository_path": {
                        "type": "string",
                        "description":
                            "The local file path to the repository that needs to be analyzed."
                    }
                },
                "required": ["repository_path"],
                "additionalProperties": false
            }),
        );
        Self { model, cache_dir: PathBuf::from(DEFAULT_CACHE_DIR), descriptor }
    }

    /// Set the directory the aggregated repository text is appended under.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Cache file for a repository: `<cache_dir>/<repository base name>.txt`.
    pub fn cache_file(&self, repository: &Path) -> PathBuf {
        let base = repository
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "repository".to_string());
        self.cache_dir.join(format!("{base}.txt"))
    }

    /// Read every source file into `"\n\n{path}\n{content}"` blocks, in traversal order.
    async fn aggregate(&self, repository: &Path) -> String {
        let mut aggregated = String::new();
        for path in collect_source_files(repository) {
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => {
                    debug!(path = %path.display(), "file read");
                    aggregated.push_str(&format!("\n\n{}\n{content}", path.display()));
                }
                Err(e) => warn!(path = %path.display(), error = %e, "error reading file"),
            }
        }
        aggregated
    }

    async fn append_to_cache(&self, repository: &Path, text: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let path = self.cache_file(repository);
        let mut file =
            tokio::fs::OpenOptions::new().create(true).append(true).open(&path).await?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;
        Ok(path)
    }
}

fn summary_prompt(content: &str) -> String {
    format!(
        "Analyze and summarize the content of a repository, which may be code or text. \
         Each file path is followed by that file's content. \
         Summarize what is happening, mentioning variable names, class names and imports, \
         and give a short summary of how the different components interact. \
         For each file, first mention its path and name.\n\
         Here is the content\n\n{content}"
    )
}

#[async_trait]
impl Tool for RepoAnalyzer {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, arguments: Value) -> Result<Value, ToolError> {
        let Some(repository_path) = arguments.get("repository_path").and_then(Value::as_str)
        else {
            warn!(tool = TOOL_NAME, "missing repository_path argument");
            return Ok(error_payload(INVALID_PATH));
        };

        let repository = Path::new(repository_path);
        if repository_path.is_empty() || !repository.is_dir() {
            warn!(tool = TOOL_NAME, repository_path, "invalid repository path");
            return Ok(error_payload(INVALID_PATH));
        }

        info!(tool = TOOL_NAME, repository_path, "analyzing repository");
        let aggregated = self.aggregate(repository).await;

        match self.append_to_cache(repository, &aggregated).await {
            Ok(path) => debug!(
                cache_file = %path.display(),
                bytes = aggregated.len(),
                "repository text cached"
            ),
            Err(e) => warn!(
                cache_dir = %self.cache_dir.display(),
                error = %e,
                "failed to write repository cache"
            ),
        }

        let request = ChatRequest::new(vec![
            Message::system(ANALYSIS_SYSTEM_PROMPT),
            Message::user(summary_prompt(&aggregated)),
        ]);
        let response = self.model.chat(request).await?;

        Ok(json!({
            "repository_path": repository_path,
            "summary": response.content(),
        }))
    }
}
