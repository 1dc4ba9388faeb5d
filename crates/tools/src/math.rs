//! Integer arithmetic tools, built as typed tools.

use serde::Deserialize;
use serde_json::{Value, json};
use thinkact_core::error::ToolError;
use thinkact_core::tool::{ParamMetadata, Tool, ToolParams, TypedTool};

#[derive(Debug, Deserialize)]
pub struct OperandParams {
    pub x: i64,
    pub y: i64,
}

impl ToolParams for OperandParams {
    fn parameters() -> Vec<ParamMetadata> {
        vec![
            ParamMetadata::new("x", "First operand", "integer"),
            ParamMetadata::new("y", "Second operand", "integer"),
        ]
    }
}

async fn add(p: OperandParams) -> Result<Value, ToolError> {
    p.x.checked_add(p.y)
        .map(|sum| json!(sum))
        .ok_or_else(|| ToolError::failed("add", "integer overflow"))
}

async fn multiply(p: OperandParams) -> Result<Value, ToolError> {
    p.x.checked_mul(p.y)
        .map(|product| json!(product))
        .ok_or_else(|| ToolError::failed("multiply", "integer overflow"))
}

pub fn add_tool() -> impl Tool {
    TypedTool::new(
        "add",
        "Add two integers, passed as `x` and `y`, and return the sum",
        add,
    )
}

pub fn multiply_tool() -> impl Tool {
    TypedTool::new(
        "multiply",
        "Multiply two integers, passed as `x` and `y`, and return the product",
        multiply,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn add_two_numbers() {
        let result = add_tool().execute(params(json!({"x": 2, "y": 3}))).await.unwrap();
        assert_eq!(result, json!(5));
    }

    #[tokio::test]
    async fn multiply_two_numbers() {
        let result = multiply_tool()
            .execute(params(json!({"x": -4, "y": 6})))
            .await
            .unwrap();
        assert_eq!(result, json!(-24));
    }

    #[tokio::test]
    async fn overflow_is_an_error() {
        let err = multiply_tool()
            .execute(params(json!({"x": i64::MAX, "y": 2})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }

    #[tokio::test]
    async fn fractional_operand_is_rejected() {
        let err = add_tool()
            .execute(params(json!({"x": 1.5, "y": 2})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn metadata_lists_operands() {
        let tool = add_tool();
        let names: Vec<_> = tool.metadata().parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }
}
