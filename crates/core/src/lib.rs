//! # thinkact Core
//!
//! Domain types, traits, and error definitions for the thinkact ReAct agent.
//! This crate has **no runtime or transport dependencies**: it defines the
//! domain model that the agent, providers, and tools crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator of the ReAct loop is a trait here:
//! - [`ModelClient`] produces schema-constrained JSON from a message history
//! - [`Tool`] executes a named capability with a loosely-typed parameter map
//! - [`EventSink`] receives the loop's progress events
//!
//! Implementations live in their respective crates, so the controller can be
//! driven by scripted stubs in tests and by real HTTP clients in the binary.

pub mod action;
pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod schema;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use action::{Action, ActionEnvelope, Observation, StopReason, Thought, ToolCall, ToolCallArgument};
pub use error::{Error, ProviderError, Result, ToolError};
pub use event::{AgentEvent, EventSink, NullSink, RecordingSink, TracingSink};
pub use message::{ChatMessage, Conversation, ConversationId, Role};
pub use provider::{ModelClient, ResponseFormat};
pub use schema::OutputSchema;
pub use tool::{ParamMetadata, Tool, ToolMetadata, ToolParams, ToolRegistry, TypedTool, decode_params};
