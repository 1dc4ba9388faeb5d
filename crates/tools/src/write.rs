//! Write tool: create or overwrite a file.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use thinkact_core::error::ToolError;
use thinkact_core::tool::{ParamMetadata, Tool, ToolMetadata, ToolParams, decode_params};

#[derive(Debug, Deserialize)]
pub struct WriteParams {
    pub file_path: String,
    pub content: String,
}

impl ToolParams for WriteParams {
    fn parameters() -> Vec<ParamMetadata> {
        vec![
            ParamMetadata::new("file_path", "Path of the file to write", "string"),
            ParamMetadata::new("content", "Full content to write to the file", "string"),
        ]
    }
}

pub struct WriteTool {
    metadata: ToolMetadata,
}

impl WriteTool {
    pub fn new() -> Self {
        Self {
            metadata: ToolMetadata::new(
                "write",
                "Write a file (providing its path as `file_path` - string) by passing a `content` (string) to write",
                WriteParams::parameters(),
            ),
        }
    }
}

impl Default for WriteTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WriteTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, params: Map<String, Value>) -> Result<Value, ToolError> {
        let params: WriteParams = decode_params(self.name(), params)?;
        let path = Path::new(&params.file_path);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::failed(self.name(), format!("create {}: {e}", parent.display())))?;
        }

        tokio::fs::write(path, &params.content)
            .await
            .map_err(|e| ToolError::failed(self.name(), format!("{}: {e}", params.file_path)))?;

        tracing::debug!(path = %params.file_path, bytes = params.content.len(), "Wrote file");

        Ok(Value::String(format!(
            "Wrote {} bytes to {}",
            params.content.len(),
            params.file_path
        )))
    }
}
