//! Agent-level streaming events.
//!
//! [`StreamingSink`] turns the loop's synchronous sink callbacks into
//! serialisable [`AgentStreamEvent`]s on an unbounded channel, so a host
//! (the CLI's `--json` mode, or any session protocol) can forward them.
//! Tool-call start and end events share a `call_N` id.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thinkact_core::action::Action;
use thinkact_core::error::Error;
use thinkact_core::event::EventSink;
use tokio::sync::mpsc;

/// Events emitted by the agent during a streaming run.
///
/// - `thought`         : reasoning step
/// - `tool_call_start` : a tool is about to run
/// - `tool_call_end`   : the tool returned
/// - `observation`     : assessment after a tool result
/// - `done`            : the model stopped
/// - `error`           : the run failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStreamEvent {
    Thought { content: String },

    ToolCallStart {
        id: String,
        name: String,
        title: String,
        input: Value,
    },

    ToolCallEnd { id: String, output: Value },

    Observation { content: String },

    Done { reason: String },

    Error { message: String },
}

impl AgentStreamEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Thought { .. } => "thought",
            Self::ToolCallStart { .. } => "tool_call_start",
            Self::ToolCallEnd { .. } => "tool_call_end",
            Self::Observation { .. } => "observation",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }
}

/// Event sink that forwards [`AgentStreamEvent`]s over a channel.
pub struct StreamingSink {
    tx: mpsc::UnboundedSender<AgentStreamEvent>,
    /// Incremented on every tool call; never shared across runs.
    tool_call_counter: u64,
}

impl StreamingSink {
    pub fn new(tx: mpsc::UnboundedSender<AgentStreamEvent>) -> Self {
        Self {
            tx,
            tool_call_counter: 0,
        }
    }

    /// A sink and the receiver of its events.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AgentStreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Report a failed run.
    pub fn on_error(&mut self, error: &Error) {
        self.send(AgentStreamEvent::Error {
            message: error.to_string(),
        });
    }

    fn current_call_id(&self) -> String {
        format!("call_{}", self.tool_call_counter)
    }

    fn send(&self, event: AgentStreamEvent) {
        // A dropped receiver just means nobody is listening
        let _ = self.tx.send(event);
    }
}

fn call_title(tool_name: &str) -> String {
    match tool_name {
        "bash" => "Executing bash command".into(),
        "read" => "Reading file".into(),
        "write" => "Writing file".into(),
        "edit" => "Editing file".into(),
        other => format!("Calling {other}"),
    }
}

impl EventSink for StreamingSink {
    fn on_thought(&mut self, thought: &str) {
        self.send(AgentStreamEvent::Thought {
            content: thought.to_string(),
        });
    }

    fn on_action(&mut self, action: &Action) {
        let Action::ToolCall(call) = action else {
            return;
        };
        self.tool_call_counter += 1;
        let input = call
            .args_to_map()
            .map(Value::Object)
            .unwrap_or(Value::Null);
        self.send(AgentStreamEvent::ToolCallStart {
            id: self.current_call_id(),
            name: call.name.clone(),
            title: call_title(&call.name),
            input,
        });
    }

    fn on_tool_end(&mut self, result: &Value) {
        self.send(AgentStreamEvent::ToolCallEnd {
            id: self.current_call_id(),
            output: result.clone(),
        });
    }

    fn on_observation(&mut self, observation: &str) {
        self.send(AgentStreamEvent::Observation {
            content: observation.to_string(),
        });
    }

    fn on_stop(&mut self, reason: &str) {
        self.send(AgentStreamEvent::Done {
            reason: reason.to_string(),
        });
    }
}
