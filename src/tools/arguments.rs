//! Typed access to tool call arguments.

use crate::error::WeftError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    fn missing(kind: &str, key: &str) -> WeftError {
        WeftError::InvalidArgument(format!("Missing {kind} argument: {key}"))
    }

    pub fn get_str(&self, key: &str) -> Result<&str, WeftError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| Self::missing("string", key))
    }

    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    pub fn get_i64(&self, key: &str) -> Result<i64, WeftError> {
        self.value
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| Self::missing("integer", key))
    }

    pub fn get_f64(&self, key: &str) -> Result<f64, WeftError> {
        self.value
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| Self::missing("number", key))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, WeftError> {
        self.value
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| Self::missing("boolean", key))
    }

    pub fn get_array(&self, key: &str) -> Result<&Vec<serde_json::Value>, WeftError> {
        self.value
            .get(key)
            .and_then(|v| v.as_array())
            .ok_or_else(|| Self::missing("array", key))
    }

    /// Deserialize the whole argument object into a typed struct.
    ///
    /// Providers that send arguments as a JSON-encoded string are accepted;
    /// an empty string reads as `{}`.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, WeftError> {
        let value = match &self.value {
            serde_json::Value::String(raw) if raw.trim().is_empty() => serde_json::json!({}),
            serde_json::Value::String(raw) => serde_json::from_str(raw.trim()).map_err(|e| {
                WeftError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
            })?,
            other => other.clone(),
        };
        serde_json::from_value(value)
            .map_err(|e| WeftError::InvalidArgument(format!("Failed to deserialize arguments: {e}")))
    }
}
