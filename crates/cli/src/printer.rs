//! Human-readable console output for a run.

use std::io::Write;

use serde_json::Value;
use thinkact_agent::render_result;
use thinkact_core::action::Action;
use thinkact_core::event::EventSink;

/// Prints each loop event as a labelled line.
pub struct ConsoleSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, label: &str, text: &str) {
        // Output errors (closed pipe) must not abort the run
        let _ = writeln!(self.out, "{label}: {text}");
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> EventSink for ConsoleSink<W> {
    fn on_thought(&mut self, thought: &str) {
        self.line("Thought", thought);
    }

    fn on_action(&mut self, action: &Action) {
        self.line("Action type", action.kind());
        if let Action::ToolCall(call) = action {
            self.line("Tool name", &call.name);
            let args = match call.args_to_map() {
                Ok(map) => Value::Object(map).to_string(),
                Err(e) => format!("<{e}>"),
            };
            self.line("Tool args", &args);
        }
    }

    fn on_tool_end(&mut self, result: &Value) {
        self.line("Tool result", &render_result(result));
    }

    fn on_observation(&mut self, observation: &str) {
        self.line("Observation", observation);
    }

    fn on_stop(&mut self, reason: &str) {
        self.line("Stop reason", reason);
    }
}
