//! Structured model outputs of the ReAct loop: thoughts, observations and
//! actions.
//!
//! The model never emits an [`Action`] directly. It emits an
//! [`ActionEnvelope`] (a tag plus two nullable payloads, the only shape a
//! strict schema can express), and [`Action::try_from`] validates that
//! exactly the payload matching the tag is present.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::schema::{OutputSchema, array_field, enum_field, nullable, strict_object, string_field};

/// Wire tag of the terminal action.
pub const DONE_TAG: &str = "_done";

/// Wire tag of the tool-call action.
pub const TOOL_CALL_TAG: &str = "tool_call";

/// Reasoning about the path forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    pub thought: String,
}

impl OutputSchema for Thought {
    fn json_schema() -> Value {
        strict_object(vec![(
            "thought",
            string_field("Thought about the path forward, based on the chat history"),
        )])
    }
}

/// Assessment of the current state after a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub observation: String,
}

impl OutputSchema for Observation {
    fn json_schema() -> Value {
        strict_object(vec![(
            "observation",
            string_field("Observation about the current state of things, based on the chat history"),
        )])
    }
}

/// Why the model decided the conversation should stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopReason {
    pub reason: String,
}

impl StopReason {
    fn schema() -> Value {
        strict_object(vec![(
            "reason",
            string_field("Reason why the conversation should stop"),
        )])
    }
}

/// One argument fragment of a tool call.
///
/// Strict schemas cannot describe an arbitrary parameter object generically,
/// so the model serialises `{"name": value, ...}` into a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallArgument {
    pub parameter_value: String,
}

impl ToolCallArgument {
    pub fn new(parameter_value: impl Into<String>) -> Self {
        Self {
            parameter_value: parameter_value.into(),
        }
    }

    /// Encode a parameter mapping into the string form.
    pub fn from_params(params: &Map<String, Value>) -> Self {
        Self::new(Value::Object(params.clone()).to_string())
    }

    fn schema() -> Value {
        strict_object(vec![(
            "parameter_value",
            string_field(
                "Parameter name and value of the parameter as a JSON string (e.g. '{\"age\": 40, \"name\": \"John Doe\"}')",
            ),
        )])
    }
}

/// A request to run a named tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub args: Vec<ToolCallArgument>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, args: Vec<ToolCallArgument>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Build a call carrying all parameters in a single argument fragment.
    pub fn with_params(name: impl Into<String>, params: &Map<String, Value>) -> Self {
        Self::new(name, vec![ToolCallArgument::from_params(params)])
    }

    /// Merge all argument fragments into one flat parameter mapping.
    ///
    /// Each fragment must decode to a JSON object. A key defined by more
    /// than one fragment is rejected rather than silently overwritten.
    pub fn args_to_map(&self) -> Result<Map<String, Value>> {
        let mut params = Map::new();

        for (index, arg) in self.args.iter().enumerate() {
            let value: Value = serde_json::from_str(&arg.parameter_value).map_err(|e| {
                Error::ArgumentDecode {
                    tool: self.name.clone(),
                    reason: format!("argument {index} is not valid JSON: {e}"),
                }
            })?;

            let Value::Object(fragment) = value else {
                return Err(Error::ArgumentDecode {
                    tool: self.name.clone(),
                    reason: format!("argument {index} is not a JSON object"),
                });
            };

            for (key, value) in fragment {
                if params.contains_key(&key) {
                    return Err(Error::ArgumentDecode {
                        tool: self.name.clone(),
                        reason: format!("parameter '{key}' is defined by more than one argument"),
                    });
                }
                params.insert(key, value);
            }
        }

        Ok(params)
    }

    fn schema() -> Value {
        strict_object(vec![
            ("name", string_field("Name of the tool to call")),
            (
                "args",
                array_field("Tool call arguments", ToolCallArgument::schema()),
            ),
        ])
    }
}

/// The raw action shape the model produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub stop_reason: Option<StopReason>,

    #[serde(default)]
    pub tool_call: Option<ToolCall>,
}

impl OutputSchema for ActionEnvelope {
    fn json_schema() -> Value {
        strict_object(vec![
            (
                "type",
                enum_field(
                    "Type of the action to perform based on the chat history. Use '_done' if you think the conversation should stop, and 'tool_call' if you want to call a tool",
                    &[DONE_TAG, TOOL_CALL_TAG],
                ),
            ),
            (
                "stop_reason",
                nullable(
                    StopReason::schema(),
                    "Reason why the conversation should stop. Only present when type is '_done'",
                ),
            ),
            (
                "tool_call",
                nullable(
                    ToolCall::schema(),
                    "Tool to call with its arguments. Only present when type is 'tool_call'",
                ),
            ),
        ])
    }
}

/// A validated action: stop, or call a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ActionEnvelope", into = "ActionEnvelope")]
pub enum Action {
    Done(StopReason),
    ToolCall(ToolCall),
}

impl Action {
    pub fn done(reason: impl Into<String>) -> Self {
        Self::Done(StopReason {
            reason: reason.into(),
        })
    }

    /// The wire tag of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Done(_) => DONE_TAG,
            Action::ToolCall(_) => TOOL_CALL_TAG,
        }
    }
}

impl TryFrom<ActionEnvelope> for Action {
    type Error = Error;

    fn try_from(envelope: ActionEnvelope) -> Result<Self> {
        let mismatch = |reason: &str| Error::Decode {
            schema: "action".into(),
            reason: reason.to_string(),
        };

        match envelope.kind.as_str() {
            DONE_TAG => match (envelope.stop_reason, envelope.tool_call) {
                (Some(stop), None) => Ok(Action::Done(stop)),
                (None, _) => Err(mismatch("'_done' action without a stop_reason")),
                (Some(_), Some(_)) => Err(mismatch("'_done' action must not carry a tool_call")),
            },
            TOOL_CALL_TAG => match (envelope.tool_call, envelope.stop_reason) {
                (Some(call), None) if call.name.trim().is_empty() => {
                    Err(mismatch("'tool_call' action with an empty tool name"))
                }
                (Some(call), None) => Ok(Action::ToolCall(call)),
                (None, _) => Err(mismatch("'tool_call' action without a tool_call")),
                (Some(_), Some(_)) => {
                    Err(mismatch("'tool_call' action must not carry a stop_reason"))
                }
            },
            other => Err(Error::UnsupportedAction(other.to_string())),
        }
    }
}

impl From<Action> for ActionEnvelope {
    fn from(action: Action) -> Self {
        match action {
            Action::Done(stop) => ActionEnvelope {
                kind: DONE_TAG.into(),
                stop_reason: Some(stop),
                tool_call: None,
            },
            Action::ToolCall(call) => ActionEnvelope {
                kind: TOOL_CALL_TAG.into(),
                stop_reason: None,
                tool_call: Some(call),
            },
        }
    }
}
