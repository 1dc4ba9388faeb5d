//! Read tool: return a file's contents.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use thinkact_core::error::ToolError;
use thinkact_core::tool::{ParamMetadata, Tool, ToolMetadata, ToolParams, decode_params};

#[derive(Debug, Deserialize)]
pub struct ReadParams {
    pub file_path: String,
}

impl ToolParams for ReadParams {
    fn parameters() -> Vec<ParamMetadata> {
        vec![ParamMetadata::new(
            "file_path",
            "Path of the file to read",
            "string",
        )]
    }
}

pub struct ReadTool {
    metadata: ToolMetadata,
}

impl ReadTool {
    pub fn new() -> Self {
        Self {
            metadata: ToolMetadata::new(
                "read",
                "Read a file, providing its path as `file_path` (string)",
                ReadParams::parameters(),
            ),
        }
    }
}

impl Default for ReadTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ReadTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, params: Map<String, Value>) -> Result<Value, ToolError> {
        let params: ReadParams = decode_params(self.name(), params)?;

        let content = tokio::fs::read_to_string(&params.file_path)
            .await
            .map_err(|e| ToolError::failed(self.name(), format!("{}: {e}", params.file_path)))?;

        Ok(Value::String(content))
    }
}
