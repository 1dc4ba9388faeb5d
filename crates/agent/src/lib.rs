//! The ReAct agent loop for thinkact.
//!
//! The agent follows a **Think → Act → Observe** cycle:
//!
//! 1. **Think**: the model produces a thought about the path forward
//! 2. **Act**: the model picks an action, either stop or call a tool
//! 3. **Dispatch**: the named tool runs and its result is appended to history
//! 4. **Observe**: the model records an observation, then thinks again
//!
//! Every model output is schema-constrained JSON decoded into a typed value
//! by the [`StructuredPredictor`]. The loop ends when the model stops, an
//! error occurs, the optional turn limit is hit, or the run is cancelled.

pub mod prompt;
pub mod react;
pub mod stream_event;
pub mod structured;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use prompt::{DEFAULT_SYSTEM_PROMPT, SystemPromptTemplate, render_tool_table};
pub use react::{ReactAgent, ReactResult, render_result};
pub use stream_event::{AgentStreamEvent, StreamingSink};
pub use structured::StructuredPredictor;
pub use tokio_util::sync::CancellationToken;
