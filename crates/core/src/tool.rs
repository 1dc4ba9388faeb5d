//! Tool trait: the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act in the world:
//! read and edit files, run commands, do arithmetic.
//!
//! The model hands every tool a loosely-typed parameter map. A tool either
//! takes that map as-is (implement [`Tool`] directly) or declares a parameter
//! struct and lets serde do the field correspondence ([`TypedTool`]).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::ToolError;

/// Prompt-facing description of one tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamMetadata {
    /// The JSON field name the model must use
    pub name: String,

    /// What the parameter means
    pub description: String,

    /// Human-readable type (e.g. "string", "integer", "array of strings")
    pub type_name: String,
}

impl ParamMetadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            type_name: type_name.into(),
        }
    }
}

impl fmt::Display for ParamMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON Definition of the parameter: {}; Description: {}; Type: {}",
            self.name, self.description, self.type_name
        )
    }
}

/// Name, description and parameters of a tool, as shown to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamMetadata>,
}

impl ToolMetadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParamMetadata>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// The core Tool trait.
///
/// Metadata is computed once when the tool is built and never changes.
#[async_trait]
pub trait Tool: Send + Sync {
    fn metadata(&self) -> &ToolMetadata;

    /// The unique name of this tool (e.g., "read", "bash").
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Execute the tool with the merged parameter map.
    async fn execute(&self, params: Map<String, Value>) -> std::result::Result<Value, ToolError>;
}

/// A parameter struct a tool decodes its arguments into.
pub trait ToolParams: DeserializeOwned + Send + 'static {
    /// One entry per field, in declaration order, named by the serde field name.
    fn parameters() -> Vec<ParamMetadata>;
}

/// Decode a loosely-typed parameter map into `P`.
///
/// A missing required field or a wrong type is reported as
/// [`ToolError::InvalidArguments`].
pub fn decode_params<P: DeserializeOwned>(
    tool_name: &str,
    params: Map<String, Value>,
) -> std::result::Result<P, ToolError> {
    serde_json::from_value(Value::Object(params)).map_err(|e| ToolError::InvalidArguments {
        tool_name: tool_name.to_string(),
        reason: e.to_string(),
    })
}

/// A tool built from an async function over a typed parameter struct.
pub struct TypedTool<P, F> {
    metadata: ToolMetadata,
    handler: F,
    _params: PhantomData<fn() -> P>,
}

impl<P, F, Fut> TypedTool<P, F>
where
    P: ToolParams,
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<Value, ToolError>> + Send,
{
    pub fn new(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self {
        Self {
            metadata: ToolMetadata::new(name, description, P::parameters()),
            handler,
            _params: PhantomData,
        }
    }
}

#[async_trait]
impl<P, F, Fut> Tool for TypedTool<P, F>
where
    P: ToolParams,
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<Value, ToolError>> + Send,
{
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, params: Map<String, Value>) -> std::result::Result<Value, ToolError> {
        let typed: P = decode_params(&self.metadata.name, params)?;
        (self.handler)(typed).await
    }
}

/// An ordered registry of available tools.
///
/// The agent loop uses this to:
/// 1. Render the tool table for the system prompt (registration order)
/// 2. Look up and execute tools when the model requests them
///
/// Built once, then shared read-only behind an `Arc`.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A second tool with an existing name is rejected.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> std::result::Result<(), ToolError> {
        if self.find(tool.name()).is_some() {
            return Err(ToolError::AlreadyRegistered(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name (first match).
    pub fn find(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Execute a tool by name.
    pub async fn execute(
        &self,
        name: &str,
        params: Map<String, Value>,
    ) -> std::result::Result<Value, ToolError> {
        let tool = self
            .find(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.execute(params).await
    }

    /// Metadata of every tool, in registration order.
    pub fn metadata(&self) -> Vec<&ToolMetadata> {
        self.tools.iter().map(|t| t.metadata()).collect()
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
