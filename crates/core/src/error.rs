//! Error types for the thinkact domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] is what a run returns.

use thiserror::Error;

/// The top-level error type returned by an agent run.
///
/// Every variant is fatal to the run that produced it.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model client (transport) errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Structured output errors ---
    #[error("Failed to decode '{schema}' output: {reason}")]
    Decode { schema: String, reason: String },

    #[error("Unsupported action type: {0}")]
    UnsupportedAction(String),

    // --- Dispatch errors ---
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for tool '{tool}': {reason}")]
    ArgumentDecode { tool: String, reason: String },

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Controller errors ---
    #[error("System prompt template error: {0}")]
    Template(String),

    #[error("Conversation error: {0}")]
    Conversation(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error("Maximum number of turns reached ({0}) without a stop action")]
    MaxTurnsExceeded(u32),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Permission denied: {tool_name}: {reason}")]
    PermissionDenied { tool_name: String, reason: String },

    #[error("Invalid arguments for {tool_name}: {reason}")]
    InvalidArguments { tool_name: String, reason: String },
}

impl ToolError {
    /// Shorthand for an execution failure carrying any displayable cause.
    pub fn failed(tool_name: &str, reason: impl std::fmt::Display) -> Self {
        Self::ExecutionFailed {
            tool_name: tool_name.to_string(),
            reason: reason.to_string(),
        }
    }
}
