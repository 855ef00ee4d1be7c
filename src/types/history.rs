//! Append-only conversation history with tool-call pairing checks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::message::{ContentBlock, Message, Role};
use crate::error::{Result, WeftError};

/// Ordered, append-only message sequence owned by one agent.
///
/// Every `ToolUse` must be answered by exactly one `ToolResult` carrying
/// the same id, either later in the same message or in the next one. Ids
/// only need to be unique among calls that are still open, so a provider may
/// reuse `call_0` once the earlier call with that id has been answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Message>", into = "Vec<Message>")]
pub struct History {
    messages: Vec<Message>,
    outstanding: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from stored messages, re-validating pairing.
    pub fn from_messages(messages: Vec<Message>) -> Result<Self> {
        let mut history = Self::new();
        for message in messages {
            history.push(message)?;
        }
        Ok(history)
    }

    /// Append a message. Rejected messages leave the history untouched.
    pub fn push(&mut self, message: Message) -> Result<()> {
        let mut carried: Vec<String> = self.outstanding.clone();
        let mut opened: Vec<String> = Vec::new();
        let mut new_ids: HashSet<String> = HashSet::new();

        for block in &message.content {
            match block {
                ContentBlock::Text { .. } => {}
                ContentBlock::ToolUse(tool_use) => {
                    if message.role != Role::Assistant {
                        return Err(WeftError::protocol(format!(
                            "tool use '{}' in a {} message",
                            tool_use.id, message.role
                        )));
                    }
                    if carried.contains(&tool_use.id) || !new_ids.insert(tool_use.id.clone()) {
                        return Err(WeftError::protocol(format!(
                            "tool use id '{}' is already open",
                            tool_use.id
                        )));
                    }
                    opened.push(tool_use.id.clone());
                }
                ContentBlock::ToolResult(result) => {
                    let id = &result.tool_use_id;
                    if let Some(pos) = carried.iter().position(|c| c == id) {
                        carried.remove(pos);
                    } else if let Some(pos) = opened.iter().position(|c| c == id) {
                        opened.remove(pos);
                    } else {
                        return Err(WeftError::protocol(format!(
                            "tool result for unknown or already resolved call id '{id}'"
                        )));
                    }
                }
            }
        }

        if !carried.is_empty() {
            return Err(WeftError::protocol(format!(
                "unresolved tool use ids from previous message: {}",
                carried.join(", ")
            )));
        }

        self.outstanding = opened;
        self.messages.push(message);
        Ok(())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Tool-use ids from the last message still awaiting a result.
    pub fn outstanding_tool_uses(&self) -> &[String] {
        &self.outstanding
    }

    /// True when no tool use is waiting for its result.
    pub fn is_settled(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Text of the most recent assistant message that carried any text.
    pub fn last_assistant_text(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant && m.has_text())
            .map(Message::text)
    }
}

impl TryFrom<Vec<Message>> for History {
    type Error = WeftError;

    fn try_from(messages: Vec<Message>) -> Result<Self> {
        Self::from_messages(messages)
    }
}

impl From<History> for Vec<Message> {
    fn from(history: History) -> Self {
        history.messages
    }
}
