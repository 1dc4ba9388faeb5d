//! Edit tool: in-place string replacement inside a file.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use thinkact_core::error::ToolError;
use thinkact_core::tool::{ParamMetadata, Tool, ToolMetadata, ToolParams, decode_params};

#[derive(Debug, Deserialize)]
pub struct EditParams {
    pub file_path: String,
    pub old_string: String,
    pub new_string: String,
    /// How many occurrences to replace, from the start; all when absent
    #[serde(default)]
    pub count: Option<usize>,
}

impl ToolParams for EditParams {
    fn parameters() -> Vec<ParamMetadata> {
        vec![
            ParamMetadata::new("file_path", "Path of the file to edit", "string"),
            ParamMetadata::new("old_string", "Exact text to replace", "string"),
            ParamMetadata::new("new_string", "Replacement text", "string"),
            ParamMetadata::new(
                "count",
                "How many occurrences to replace (omit or null to replace all)",
                "integer or null",
            ),
        ]
    }
}

pub struct EditTool {
    metadata: ToolMetadata,
}

impl EditTool {
    pub fn new() -> Self {
        Self {
            metadata: ToolMetadata::new(
                "edit",
                "Edit a file (providing its path as `file_path` - string), by passing the old and new string (`old_string` and `new_string` parameters) and how many times to replace it (the `count` parameter, an integer)",
                EditParams::parameters(),
            ),
        }
    }
}

impl Default for EditTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace up to `count` occurrences (all when `None`), returning the new
/// text and how many were replaced.
fn replace(content: &str, old: &str, new: &str, count: Option<usize>) -> (String, usize) {
    let found = content.matches(old).count();
    match count {
        Some(n) => (content.replacen(old, new, n), found.min(n)),
        None => (content.replace(old, new), found),
    }
}

#[async_trait]
impl Tool for EditTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, params: Map<String, Value>) -> Result<Value, ToolError> {
        let params: EditParams = decode_params(self.name(), params)?;

        if params.old_string.is_empty() {
            return Err(ToolError::InvalidArguments {
                tool_name: self.name().into(),
                reason: "old_string must not be empty".into(),
            });
        }
        if params.count == Some(0) {
            return Err(ToolError::InvalidArguments {
                tool_name: self.name().into(),
                reason: "count must be at least 1".into(),
            });
        }

        let content = tokio::fs::read_to_string(&params.file_path)
            .await
            .map_err(|e| ToolError::failed(self.name(), format!("{}: {e}", params.file_path)))?;

        let (updated, replaced) = replace(
            &content,
            &params.old_string,
            &params.new_string,
            params.count,
        );
        if replaced == 0 {
            return Err(ToolError::failed(
                self.name(),
                format!("old_string not found in {}", params.file_path),
            ));
        }

        tokio::fs::write(&params.file_path, updated)
            .await
            .map_err(|e| ToolError::failed(self.name(), format!("{}: {e}", params.file_path)))?;

        Ok(Value::String(format!(
            "Replaced {replaced} occurrence(s) in {}",
            params.file_path
        )))
    }
}
