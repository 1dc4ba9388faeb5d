//! ReAct controller: Think → Act → (dispatch | stop) → Observe.
//!
//! One run drives a single [`Conversation`] through an explicit state
//! machine:
//!
//! ```text
//! Init → Thinking → Acting ─┬─ Done ─────────────→ Stopped
//!           ↑               └─ ToolCall → Dispatching
//!           └──────── Observing ←──────────┘
//! ```
//!
//! Every step is awaited in order. Model calls and tool executions race the
//! run's cancellation token. Any error ends the run and is returned as-is.

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use thinkact_core::action::{Action, ActionEnvelope, Observation, Thought, ToolCall};
use thinkact_core::error::{Error, Result};
use thinkact_core::event::EventSink;
use thinkact_core::message::{ChatMessage, Conversation};
use thinkact_core::provider::ModelClient;
use thinkact_core::tool::ToolRegistry;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::prompt::SystemPromptTemplate;
use crate::structured::StructuredPredictor;

const THOUGHT_DESCRIPTION: &str =
    "Thoughts about the action to perform next, based on current chat history";

const ACTION_DESCRIPTION: &str = "Action to take, based on the chat history. Choose within _done (accompanied with a stop reason), if you think the conversation should stop, or tool_call (accompanied by a tool call) if you think the conversation should continue and you need more input from available tooling.";

const OBSERVATION_DESCRIPTION: &str =
    "Observation about the current state of the task, based on chat history";

/// A ReAct agent bound to one model client and one tool registry.
///
/// Cheap to share: the registry is behind an `Arc` and the agent holds no
/// per-run state, so any number of runs may use it concurrently.
pub struct ReactAgent {
    predictor: StructuredPredictor,
    tools: Arc<ToolRegistry>,
    template: SystemPromptTemplate,
    /// Upper bound on turns; unbounded when `None`.
    max_turns: Option<u32>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactResult {
    /// The reason the model gave for stopping.
    pub stop_reason: String,
    /// Number of Thinking phases entered.
    pub turns: u32,
    /// Tool calls that completed successfully.
    pub tool_calls_made: u32,
}

enum Phase {
    Thinking,
    Acting,
    Dispatching(ToolCall),
    Observing,
    Stopped(String),
}

impl ReactAgent {
    pub fn new(client: Arc<dyn ModelClient>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            predictor: StructuredPredictor::new(client),
            tools,
            template: SystemPromptTemplate::default(),
            max_turns: None,
        }
    }

    /// Replace the system prompt template.
    pub fn with_template(mut self, template: SystemPromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Fail a run with `MaxTurnsExceeded` instead of starting turn `max + 1`.
    pub fn with_max_turns(mut self, max: u32) -> Self {
        self.max_turns = Some(max);
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// The rendered system prompt for this agent's tools.
    pub fn system_prompt(&self) -> String {
        self.template.render(&self.tools)
    }

    /// Run the loop to completion without external cancellation.
    pub async fn run(
        &self,
        conversation: &mut Conversation,
        prompt: &str,
        sink: &mut dyn EventSink,
    ) -> Result<ReactResult> {
        self.run_with_cancel(conversation, prompt, sink, &CancellationToken::new())
            .await
    }

    /// Run the loop until the model stops, an error occurs, or `cancel` fires.
    ///
    /// An empty conversation is seeded with the system prompt; a non-empty
    /// one is carried forward and only receives the new user prompt.
    pub async fn run_with_cancel(
        &self,
        conversation: &mut Conversation,
        prompt: &str,
        sink: &mut dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<ReactResult> {
        info!(
            conversation = %conversation.id,
            client = self.predictor.client().name(),
            tools = self.tools.len(),
            max_turns = ?self.max_turns,
            "ReAct loop starting"
        );

        if conversation.is_empty() {
            conversation.push(ChatMessage::system(self.system_prompt()))?;
        }
        conversation.push(ChatMessage::user(prompt))?;

        let mut turns = 0u32;
        let mut tool_calls_made = 0u32;
        let mut phase = Phase::Thinking;

        loop {
            phase = match phase {
                Phase::Thinking => {
                    if let Some(max) = self.max_turns
                        && turns >= max
                    {
                        warn!(max_turns = max, "ReAct: max turns reached");
                        return Err(Error::MaxTurnsExceeded(max));
                    }
                    turns += 1;
                    debug!(turn = turns, "Thinking");

                    let thought: Thought = cancellable(
                        cancel,
                        self.predictor
                            .predict(conversation.messages(), "thought", THOUGHT_DESCRIPTION),
                    )
                    .await?;

                    conversation.push(ChatMessage::assistant(thought.thought.clone()))?;
                    sink.on_thought(&thought.thought);
                    Phase::Acting
                }

                Phase::Acting => {
                    let envelope: ActionEnvelope = cancellable(
                        cancel,
                        self.predictor
                            .predict(conversation.messages(), "action", ACTION_DESCRIPTION),
                    )
                    .await?;

                    let action = Action::try_from(envelope)?;
                    debug!(action = action.kind(), "Acting");

                    match action {
                        Action::Done(stop) => {
                            sink.on_stop(&stop.reason);
                            Phase::Stopped(stop.reason)
                        }
                        Action::ToolCall(ref call) => {
                            sink.on_action(&action);
                            Phase::Dispatching(call.clone())
                        }
                    }
                }

                Phase::Dispatching(call) => {
                    let params = call.args_to_map()?;
                    let tool = self
                        .tools
                        .find(&call.name)
                        .ok_or_else(|| Error::UnknownTool(call.name.clone()))?;

                    debug!(tool = %call.name, params = params.len(), "Dispatching tool call");

                    let result = cancellable(cancel, async {
                        tool.execute(params).await.map_err(Error::from)
                    })
                    .await?;
                    tool_calls_made += 1;

                    conversation.push(ChatMessage::user(format!(
                        "Tool call result from {}: {}",
                        call.name,
                        render_result(&result)
                    )))?;
                    sink.on_tool_end(&result);
                    Phase::Observing
                }

                Phase::Observing => {
                    let observation: Observation = cancellable(
                        cancel,
                        self.predictor.predict(
                            conversation.messages(),
                            "observation",
                            OBSERVATION_DESCRIPTION,
                        ),
                    )
                    .await?;

                    conversation.push(ChatMessage::assistant(observation.observation.clone()))?;
                    sink.on_observation(&observation.observation);
                    Phase::Thinking
                }

                Phase::Stopped(stop_reason) => {
                    info!(
                        turns,
                        tool_calls = tool_calls_made,
                        history_tokens = conversation.estimated_tokens(),
                        "ReAct loop completed"
                    );
                    return Ok(ReactResult {
                        stop_reason,
                        turns,
                        tool_calls_made,
                    });
                }
            };
        }
    }
}

/// Await `step` unless `cancel` fires first.
async fn cancellable<T>(
    cancel: &CancellationToken,
    step: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = step => result,
    }
}

/// Render a tool result as text: strings raw, anything else as compact JSON.
pub fn render_result(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
