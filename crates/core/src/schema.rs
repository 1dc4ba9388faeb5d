//! JSON-schema descriptors for structured model output.
//!
//! Strict structured-output backends accept a restricted schema dialect:
//! every property must be listed in `required`, `additionalProperties` must
//! be `false`, and optional payloads are expressed as a nullable type rather
//! than an absent key. The helpers here only ever produce that dialect.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

/// A type the model can be asked to produce.
pub trait OutputSchema: DeserializeOwned {
    /// The strict JSON schema describing this type's wire shape.
    fn json_schema() -> Value;
}

/// A `string` property with a description.
pub fn string_field(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

/// A `string` property restricted to `values`.
pub fn enum_field(description: &str, values: &[&str]) -> Value {
    json!({ "type": "string", "description": description, "enum": values })
}

/// An `array` property of `items`.
pub fn array_field(description: &str, items: Value) -> Value {
    json!({ "type": "array", "description": description, "items": items })
}

/// A closed object with every property required, in the given order.
pub fn strict_object(properties: Vec<(&str, Value)>) -> Value {
    let required: Vec<Value> = properties
        .iter()
        .map(|(name, _)| Value::String((*name).to_string()))
        .collect();
    let properties: Map<String, Value> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// Make an object schema nullable and attach a description.
pub fn nullable(mut schema: Value, description: &str) -> Value {
    if let Some(obj) = schema.as_object_mut() {
        let ty = obj.get("type").cloned().unwrap_or(Value::Null);
        obj.insert("type".into(), json!([ty, "null"]));
        obj.insert("description".into(), Value::String(description.into()));
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_object_requires_every_property_in_order() {
        let schema = strict_object(vec![
            ("b", string_field("second letter")),
            ("a", string_field("first letter")),
        ]);
        assert_eq!(schema["required"], json!(["b", "a"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["a"]["type"], "string");
    }

    #[test]
    fn nullable_wraps_type() {
        let schema = nullable(strict_object(vec![("x", string_field("x"))]), "maybe");
        assert_eq!(schema["type"], json!(["object", "null"]));
        assert_eq!(schema["description"], "maybe");
    }

    #[test]
    fn enum_field_lists_values() {
        let schema = enum_field("kind", &["_done", "tool_call"]);
        assert_eq!(schema["enum"], json!(["_done", "tool_call"]));
    }
}
