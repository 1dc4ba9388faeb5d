//! Agent events: the observable progress of a ReAct run.
//!
//! The controller calls an [`EventSink`] synchronously, in strict iteration
//! order, right after each state it reaches. Sinks shipped here:
//! [`RecordingSink`] (tests and replay), [`TracingSink`] (logs) and
//! [`NullSink`]. The streaming bridge lives in `thinkact-agent`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::Action;

/// Receiver of loop events. Every method defaults to a no-op.
pub trait EventSink: Send {
    /// A thought was produced and appended.
    fn on_thought(&mut self, _thought: &str) {}

    /// The model chose to call a tool.
    fn on_action(&mut self, _action: &Action) {}

    /// A tool returned successfully.
    fn on_tool_end(&mut self, _result: &Value) {}

    /// An observation was produced and appended.
    fn on_observation(&mut self, _observation: &str) {}

    /// The model chose to stop.
    fn on_stop(&mut self, _reason: &str) {}
}

/// A serialisable record of one sink callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AgentEvent {
    Thought { text: String },
    Action { action: Action },
    ToolEnd { result: Value },
    Observation { text: String },
    Stop { reason: String },
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {}

/// Keeps every event in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<AgentEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results of every completed tool call.
    pub fn tool_results(&self) -> Vec<&Value> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AgentEvent::ToolEnd { result } => Some(result),
                _ => None,
            })
            .collect()
    }

    /// Reasons of every stop event.
    pub fn stops(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AgentEvent::Stop { reason } => Some(reason.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn on_thought(&mut self, thought: &str) {
        self.events.push(AgentEvent::Thought {
            text: thought.to_string(),
        });
    }

    fn on_action(&mut self, action: &Action) {
        self.events.push(AgentEvent::Action {
            action: action.clone(),
        });
    }

    fn on_tool_end(&mut self, result: &Value) {
        self.events.push(AgentEvent::ToolEnd {
            result: result.clone(),
        });
    }

    fn on_observation(&mut self, observation: &str) {
        self.events.push(AgentEvent::Observation {
            text: observation.to_string(),
        });
    }

    fn on_stop(&mut self, reason: &str) {
        self.events.push(AgentEvent::Stop {
            reason: reason.to_string(),
        });
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_thought(&mut self, thought: &str) {
        tracing::info!(thought, "Thought");
    }

    fn on_action(&mut self, action: &Action) {
        match action {
            Action::ToolCall(call) => {
                tracing::info!(tool = %call.name, args = call.args.len(), "Tool call")
            }
            Action::Done(stop) => tracing::info!(reason = %stop.reason, "Done"),
        }
    }

    fn on_tool_end(&mut self, result: &Value) {
        tracing::debug!(%result, "Tool result");
    }

    fn on_observation(&mut self, observation: &str) {
        tracing::info!(observation, "Observation");
    }

    fn on_stop(&mut self, reason: &str) {
        tracing::info!(reason, "Stopped");
    }
}
