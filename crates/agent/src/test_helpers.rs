//! Shared test helpers: a scripted model client and response builders.

use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use thinkact_core::error::ProviderError;
use thinkact_core::message::ChatMessage;
use thinkact_core::provider::{ModelClient, ResponseFormat};

/// A model client that replays scripted raw responses in order.
///
/// Every request is recorded. Once the script runs out, calls fail with a
/// provider error.
pub struct ScriptedClient {
    responses: Mutex<VecDeque<String>>,
    formats: Mutex<Vec<ResponseFormat>>,
    history_lens: Mutex<Vec<usize>>,
}

impl ScriptedClient {
    pub fn new<S: Into<String>>(responses: Vec<S>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            formats: Mutex::new(Vec::new()),
            history_lens: Mutex::new(Vec::new()),
        }
    }

    /// Response formats received so far.
    pub fn formats(&self) -> Vec<ResponseFormat> {
        self.formats.lock().unwrap().clone()
    }

    /// Schema names requested so far, in order.
    pub fn schema_names(&self) -> Vec<String> {
        self.formats().into_iter().map(|f| f.name).collect()
    }

    /// History length seen by each call.
    pub fn history_lens(&self) -> Vec<usize> {
        self.history_lens.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ModelClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn structured_chat(
        &self,
        history: &[ChatMessage],
        format: &ResponseFormat,
    ) -> Result<String, ProviderError> {
        self.formats.lock().unwrap().push(format.clone());
        self.history_lens.lock().unwrap().push(history.len());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 500,
                message: "script exhausted".into(),
            })
    }
}

/// A model client whose calls never complete.
pub struct PendingClient;

#[async_trait::async_trait]
impl ModelClient for PendingClient {
    fn name(&self) -> &str {
        "pending"
    }

    async fn structured_chat(
        &self,
        _history: &[ChatMessage],
        _format: &ResponseFormat,
    ) -> Result<String, ProviderError> {
        std::future::pending().await
    }
}

pub fn thought(text: &str) -> String {
    json!({ "thought": text }).to_string()
}

pub fn observation(text: &str) -> String {
    json!({ "observation": text }).to_string()
}

pub fn done(reason: &str) -> String {
    json!({ "type": "_done", "stop_reason": { "reason": reason }, "tool_call": null }).to_string()
}

/// A tool call action with one argument fragment per entry of `fragments`.
pub fn tool_call(name: &str, fragments: &[&str]) -> String {
    let args: Vec<Value> = fragments
        .iter()
        .map(|f| json!({ "parameter_value": f }))
        .collect();
    json!({
        "type": "tool_call",
        "stop_reason": null,
        "tool_call": { "name": name, "args": args }
    })
    .to_string()
}
