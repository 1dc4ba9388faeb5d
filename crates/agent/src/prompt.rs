//! System prompt rendering.
//!
//! The template carries exactly one `{{tools}}` placeholder, replaced by a
//! Markdown table with one row per registered tool.

use thinkact_core::error::{Error, Result};
use thinkact_core::tool::ToolRegistry;

pub const TOOLS_PLACEHOLDER: &str = "{{tools}}";

const TABLE_HEADER: &str = "| Name | Description | Parameters |\n|-------|-------|-------|\n";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that solves tasks step by step.

On every turn you first think about the path forward, then choose one action:
- call one of the tools below when you need more information or need to change something;
- stop with `_done` and a short reason once the task is complete.

Tool call arguments are JSON objects encoded as strings, using the exact parameter names listed in the table.
After each tool call you will receive its result and record an observation before thinking again.

Available tools:

{{tools}}";

#[derive(Debug, Clone)]
pub struct SystemPromptTemplate {
    template: String,
}

impl SystemPromptTemplate {
    /// Parse a template; it must contain `{{tools}}` exactly once.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        match template.matches(TOOLS_PLACEHOLDER).count() {
            1 => Ok(Self { template }),
            0 => Err(Error::Template(format!(
                "template is missing the {TOOLS_PLACEHOLDER} placeholder"
            ))),
            n => Err(Error::Template(format!(
                "template contains {TOOLS_PLACEHOLDER} {n} times, expected once"
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn render(&self, tools: &ToolRegistry) -> String {
        self.template
            .replacen(TOOLS_PLACEHOLDER, &render_tool_table(tools), 1)
    }
}

impl Default for SystemPromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Render the Markdown tool table, in registration order.
pub fn render_tool_table(tools: &ToolRegistry) -> String {
    let mut table = String::from(TABLE_HEADER);
    for meta in tools.metadata() {
        let params: Vec<String> = meta.parameters.iter().map(|p| p.to_string()).collect();
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&meta.name),
            escape_cell(&meta.description),
            escape_cell(&params.join(" - "))
        ));
    }
    table.push('\n');
    table
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
