//! Bash tool: run a program with an argument list.
//!
//! The program is executed directly (no shell interpolation). An optional
//! allowlist restricts which programs may run.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use thinkact_core::error::ToolError;
use thinkact_core::tool::{ParamMetadata, Tool, ToolMetadata, ToolParams, decode_params};
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct BashParams {
    pub command: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl ToolParams for BashParams {
    fn parameters() -> Vec<ParamMetadata> {
        vec![
            ParamMetadata::new("command", "Program to run (e.g. \"ls\")", "string"),
            ParamMetadata::new("arguments", "Arguments passed to the program", "array of strings"),
        ]
    }
}

/// Execute commands with an optional allowlist.
pub struct BashTool {
    metadata: ToolMetadata,
    /// If non-empty, only these programs are allowed.
    allowed_commands: Vec<String>,
}

impl BashTool {
    pub fn new(allowed_commands: Vec<String>) -> Self {
        Self {
            metadata: ToolMetadata::new(
                "bash",
                "Execute a bash command by providing the main command (`command` parameter - string) and the arguments for it (`arguments` parameter - list of strings)",
                BashParams::parameters(),
            ),
            allowed_commands,
        }
    }

    fn is_command_allowed(&self, command: &str) -> bool {
        if self.allowed_commands.is_empty() {
            return true;
        }

        // "/usr/bin/git" is checked as "git"
        let program = Path::new(command)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(command);

        self.allowed_commands.iter().any(|a| a == program)
    }
}

#[async_trait]
impl Tool for BashTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    async fn execute(&self, params: Map<String, Value>) -> Result<Value, ToolError> {
        let params: BashParams = decode_params(self.name(), params)?;

        if params.command.trim().is_empty() {
            return Err(ToolError::InvalidArguments {
                tool_name: self.name().into(),
                reason: "command must not be empty".into(),
            });
        }

        if !self.is_command_allowed(&params.command) {
            return Err(ToolError::PermissionDenied {
                tool_name: self.name().into(),
                reason: format!("Command '{}' not in allowlist", params.command),
            });
        }

        debug!(command = %params.command, args = ?params.arguments, "Executing command");

        // A cancelled run drops this future; the child must not outlive it
        let output = Command::new(&params.command)
            .args(&params.arguments)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ToolError::failed(self.name(), format!("{}: {e}", params.command)))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            warn!(command = %params.command, exit_code = code, "Command failed");
            return Err(ToolError::failed(
                self.name(),
                format!("exit code {code}: {}", combined.trim()),
            ));
        }

        Ok(Value::String(combined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn allowlist_check() {
        let tool = BashTool::new(vec!["ls".into(), "cat".into(), "git".into()]);
        assert!(tool.is_command_allowed("ls"));
        assert!(tool.is_command_allowed("/usr/bin/git"));
        assert!(!tool.is_command_allowed("rm"));
        assert!(!tool.is_command_allowed("sudo"));
    }

    #[test]
    fn empty_allowlist_allows_all() {
        let tool = BashTool::new(vec![]);
        assert!(tool.is_command_allowed("anything"));
    }

    #[tokio::test]
    async fn execute_echo() {
        let tool = BashTool::new(vec![]);
        let result = tool
            .execute(params(json!({"command": "echo", "arguments": ["hello", "world"]})))
            .await
            .unwrap();
        assert_eq!(result.as_str().unwrap().trim(), "hello world");
    }

    #[tokio::test]
    async fn arguments_default_to_empty() {
        let tool = BashTool::new(vec![]);
        let result = tool.execute(params(json!({"command": "pwd"}))).await.unwrap();
        assert!(!result.as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blocked_command() {
        let tool = BashTool::new(vec!["echo".into()]);
        let err = tool
            .execute(params(json!({"command": "rm", "arguments": ["-rf", "/"]})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let tool = BashTool::new(vec![]);
        let err = tool
            .execute(params(json!({"command": "ls", "arguments": ["/definitely/not/here"]})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exit code"));
    }

    #[tokio::test]
    async fn unknown_program_is_an_error() {
        let tool = BashTool::new(vec![]);
        let err = tool
            .execute(params(json!({"command": "thinkact-no-such-program"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn dropped_execution_kills_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let script = format!("sleep 1; touch {}", marker.display());

        let tool = BashTool::new(vec![]);
        let interrupted = tokio::time::timeout(
            std::time::Duration::from_millis(200),
            tool.execute(params(json!({"command": "sh", "arguments": ["-c", script]}))),
        )
        .await;
        assert!(interrupted.is_err());

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
