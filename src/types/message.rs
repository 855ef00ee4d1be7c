//! Message types exchanged between agents, models and tools.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message in an agent's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message from explicit blocks.
    pub fn new(role: Role, content: Vec<ContentBlock>) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentBlock::text(text)])
    }

    /// Create an assistant text message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentBlock::text(text)])
    }

    /// Create a tool-role message carrying one or more results.
    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        Self::new(
            Role::Tool,
            results.into_iter().map(ContentBlock::ToolResult).collect(),
        )
    }

    /// Concatenate all text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Whether the message carries at least one text block.
    pub fn has_text(&self) -> bool {
        self.content
            .iter()
            .any(|block| matches!(block, ContentBlock::Text { .. }))
    }

    /// Tool-use requests in block order.
    pub fn tool_uses(&self) -> Vec<&ToolUse> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse(tu) => Some(tu),
                _ => None,
            })
            .collect()
    }

    /// Tool results in block order.
    pub fn tool_results_iter(&self) -> impl Iterator<Item = &ToolResult> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::ToolResult(tr) => Some(tr),
            _ => None,
        })
    }

    pub fn has_tool_results(&self) -> bool {
        self.tool_results_iter().next().is_some()
    }
}

/// Conversation role.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A single block of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ToolUse(ToolUse),
    ToolResult(ToolResult),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self::ToolUse(ToolUse {
            id: id.into(),
            name: name.into(),
            arguments,
        })
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolUse {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// The outcome of one tool invocation, correlated by `tool_use_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub tool_use_id: String,
    pub result: serde_json::Value,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(tool_use_id: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            result,
            is_error: false,
        }
    }

    /// Error result with the `{ "error", "kind" }` payload shape.
    pub fn error(tool_use_id: impl Into<String>, kind: &str, message: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            result: serde_json::json!({ "error": message.into(), "kind": kind }),
            is_error: true,
        }
    }

    /// Error message from an error payload, if this is an error result.
    pub fn error_message(&self) -> Option<&str> {
        if !self.is_error {
            return None;
        }
        self.result.get("error").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn blocks_serialize_with_type_tag() {
        let block = ContentBlock::tool_use("c1", "add", json!({"a": 2}));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({"type": "tool_use", "id": "c1", "name": "add", "arguments": {"a": 2}})
        );
    }

    #[test]
    fn text_joins_only_text_blocks() {
        let msg = Message::new(
            Role::Assistant,
            vec![
                ContentBlock::text("Let me "),
                ContentBlock::tool_use("c1", "lookup", json!({})),
                ContentBlock::text("check."),
            ],
        );
        assert_eq!(msg.text(), "Let me check.");
        assert_eq!(msg.tool_uses().len(), 1);
    }

    #[test]
    fn error_result_carries_kind() {
        let result = ToolResult::error("c9", "timeout", "tool timed out");
        assert!(result.is_error);
        assert_eq!(result.error_message(), Some("tool timed out"));
        assert_eq!(result.result["kind"], "timeout");
    }

    #[test]
    fn role_parses_from_lowercase() {
        assert_eq!("tool".parse::<Role>().unwrap(), Role::Tool);
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
