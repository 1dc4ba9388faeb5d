//! Built-in tool implementations for thinkact.
//!
//! Two toolsets ship with the binary:
//! - `coding`: read, write, edit, bash
//! - `math`: add, multiply

pub mod bash;
pub mod edit;
pub mod math;
pub mod read;
pub mod write;

use std::sync::Arc;

use thinkact_core::error::ToolError;
use thinkact_core::tool::ToolRegistry;

pub use bash::BashTool;
pub use edit::EditTool;
pub use read::ReadTool;
pub use write::WriteTool;

/// Registry with the file and command tools.
pub fn coding_registry(allowed_commands: Vec<String>) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ReadTool::new()))?;
    registry.register(Arc::new(WriteTool::new()))?;
    registry.register(Arc::new(EditTool::new()))?;
    registry.register(Arc::new(BashTool::new(allowed_commands)))?;
    Ok(registry)
}

/// Registry with the arithmetic tools.
pub fn math_registry() -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(math::add_tool()))?;
    registry.register(Arc::new(math::multiply_tool()))?;
    Ok(registry)
}

/// Build the registry for a named toolset.
pub fn registry_for(toolset: &str, allowed_commands: Vec<String>) -> Result<ToolRegistry, ToolError> {
    match toolset {
        "coding" => coding_registry(allowed_commands),
        "math" => math_registry(),
        other => Err(ToolError::NotFound(format!("toolset '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coding_registry_order() {
        let registry = coding_registry(vec![]).unwrap();
        assert_eq!(registry.names(), vec!["read", "write", "edit", "bash"]);
    }

    #[test]
    fn math_registry_order() {
        assert_eq!(math_registry().unwrap().names(), vec!["add", "multiply"]);
    }

    #[test]
    fn every_tool_is_described() {
        for registry in [coding_registry(vec![]).unwrap(), math_registry().unwrap()] {
            for meta in registry.metadata() {
                assert!(!meta.name.is_empty());
                assert!(!meta.description.is_empty());
                assert!(!meta.parameters.is_empty());
            }
        }
    }

    #[test]
    fn builtin_toolsets_register_cleanly() {
        assert!(coding_registry(vec!["ls".into()]).is_ok());
        assert!(math_registry().is_ok());
        assert_eq!(registry_for("coding", vec![]).unwrap().len(), 4);
    }

    #[test]
    fn unknown_toolset() {
        assert!(registry_for("gardening", vec![]).is_err());
        assert_eq!(registry_for("math", vec![]).unwrap().len(), 2);
    }
}
