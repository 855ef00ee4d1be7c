//! Validate tool call arguments against a JSON Schema before execution.

use crate::error::WeftError;

/// Field path used for violations on the argument value itself.
pub const ROOT_FIELD: &str = "$";

/// Validate tool arguments against a JSON Schema.
///
/// Covers `type`, `required`, property types, `enum`, nested object
/// `properties` and array `items`. The first violation found is returned as
/// [`WeftError::SchemaViolation`] with a dotted path such as `address.city`
/// or `tags[2]`.
pub fn validate_arguments(
    tool: &str,
    args: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), WeftError> {
    validate_value(ROOT_FIELD, args, schema)
        .map_err(|(field, reason)| WeftError::schema_violation(tool, field, reason))
}

fn validate_value(
    path: &str,
    value: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), (String, String)> {
    if let Some(expected) = schema.get("type").and_then(|v| v.as_str()) {
        if !value_matches_type(value, expected) {
            return Err((
                path.to_string(),
                format!("expected type '{expected}', got {}", json_type_name(value)),
            ));
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(|v| v.as_array()) {
        if !allowed.contains(value) {
            let options = serde_json::Value::Array(allowed.clone());
            return Err((path.to_string(), format!("value {value} is not one of {options}")));
        }
    }

    if let Some(obj) = value.as_object() {
        if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
            for name in required.iter().filter_map(|f| f.as_str()) {
                if !obj.contains_key(name) {
                    return Err((child_path(path, name), "missing required field".to_string()));
                }
            }
        }
        if let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) {
            for (key, field_value) in obj {
                if let Some(prop_schema) = properties.get(key) {
                    validate_value(&child_path(path, key), field_value, prop_schema)?;
                }
            }
        }
    }

    if let (Some(items), Some(elements)) = (schema.get("items"), value.as_array()) {
        for (index, element) in elements.iter().enumerate() {
            validate_value(&format!("{path}[{index}]"), element, items)?;
        }
    }

    Ok(())
}

fn child_path(parent: &str, key: &str) -> String {
    if parent == ROOT_FIELD {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn value_matches_type(value: &serde_json::Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
