//! Model client trait: the abstraction over structured-output LLM backends.
//!
//! The ReAct loop only ever needs one capability from a model: given the
//! conversation so far and a JSON schema, return JSON text that validates
//! against that schema.
//!
//! Implementations: OpenAI-compatible endpoints (see `thinkact-providers`),
//! scripted stubs in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::ChatMessage;

/// A strict JSON-schema response format sent alongside the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Schema identifier (e.g. "thought", "action")
    pub name: String,

    /// Natural-language steer for the model
    pub description: String,

    /// JSON Schema the response must validate against
    pub schema: serde_json::Value,

    /// Whether the backend must enforce the schema exactly
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_strict() -> bool {
    true
}

impl ResponseFormat {
    pub fn strict(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            strict: true,
        }
    }
}

/// The core model-client trait.
///
/// Retries, timeouts and authentication are the implementation's concern;
/// the controller propagates whatever error comes back.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// A human-readable name for this client (e.g., "openai", "ollama").
    fn name(&self) -> &str;

    /// Produce a single JSON response conforming to `format`.
    async fn structured_chat(
        &self,
        history: &[ChatMessage],
        format: &ResponseFormat,
    ) -> std::result::Result<String, ProviderError>;
}
