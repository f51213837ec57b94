//! Tool contract: a descriptor advertised to the model plus a handler.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ToolError;

/// Static metadata describing a tool to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self { name: name.into(), description: description.into(), parameters }
    }

    /// The `{"type": "function", "function": {...}}` envelope chat endpoints expect.
    pub fn to_function_value(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// A capability the model can invoke with structured arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Run the tool.
    ///
    /// Invalid arguments are reported through [`error_payload`] in `Ok`, so
    /// the model can react to them. `Err` is reserved for hard failures.
    async fn invoke(&self, arguments: Value) -> Result<Value, ToolError>;
}

/// Structured error returned to the model instead of failing the turn.
pub fn error_payload(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}
