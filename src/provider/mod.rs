//! Model provider trait and request/response types.

pub mod scripted;

pub use scripted::ScriptedProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::WeftError;
use crate::types::{ContentBlock, Message, ToolUse, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

/// Tool definition advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider: text and/or tool-use blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Usage,
}

impl ModelResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            usage: Usage::default(),
        }
    }

    /// Response requesting the given tool calls.
    pub fn tool_uses(calls: Vec<ToolUse>) -> Self {
        Self {
            content: calls.into_iter().map(ContentBlock::ToolUse).collect(),
            usage: Usage::default(),
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub fn tool_calls(&self) -> Vec<&ToolUse> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse(tu) => Some(tu),
                _ => None,
            })
            .collect()
    }

    /// Reject responses a model may not produce.
    ///
    /// Responses must be non-empty, must not carry tool results, and tool-use
    /// ids must be non-empty and unique.
    pub fn validate(&self) -> Result<(), WeftError> {
        if self.content.is_empty() {
            return Err(WeftError::InvalidResponse("empty response".into()));
        }
        let mut ids = std::collections::HashSet::new();
        for block in &self.content {
            match block {
                ContentBlock::Text { .. } => {}
                ContentBlock::ToolResult(result) => {
                    return Err(WeftError::InvalidResponse(format!(
                        "response contains tool result for '{}'",
                        result.tool_use_id
                    )));
                }
                ContentBlock::ToolUse(tu) => {
                    if tu.id.is_empty() || tu.name.is_empty() {
                        return Err(WeftError::InvalidResponse(
                            "tool use without id or name".into(),
                        ));
                    }
                    if !ids.insert(tu.id.as_str()) {
                        return Err(WeftError::InvalidResponse(format!(
                            "duplicate tool use id '{}'",
                            tu.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Core trait implemented by model backends.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name, used in logs and events.
    fn name(&self) -> &str;

    /// Produce the next assistant response for `request`.
    ///
    /// Failures are `ProviderUnavailable`, `RateLimited` or `InvalidResponse`.
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, WeftError>;
}
