//! Context windowing: which part of the history a model query sees.

use crate::types::Message;

/// Shapes the messages sent to the model without touching stored history.
pub trait ConversationManager: Send + Sync + std::fmt::Debug {
    /// Messages to include in the next model request.
    fn window(&self, messages: &[Message]) -> Vec<Message>;
}

/// Sends the entire history.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullHistory;

impl ConversationManager for FullHistory {
    fn window(&self, messages: &[Message]) -> Vec<Message> {
        messages.to_vec()
    }
}

/// Sends the most recent `max_messages` messages.
///
/// A window never opens on a message carrying tool results; it is widened
/// backwards to include the matching tool-use message instead.
#[derive(Debug, Clone, Copy)]
pub struct SlidingWindow {
    pub max_messages: usize,
}

impl SlidingWindow {
    pub fn new(max_messages: usize) -> Self {
        Self {
            max_messages: max_messages.max(1),
        }
    }

    fn start_index(&self, messages: &[Message]) -> usize {
        let mut start = messages.len().saturating_sub(self.max_messages);
        while start > 0 && messages[start].has_tool_results() {
            start -= 1;
        }
        start
    }
}

impl ConversationManager for SlidingWindow {
    fn window(&self, messages: &[Message]) -> Vec<Message> {
        messages[self.start_index(messages)..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentBlock, Role, ToolResult};
    use serde_json::json;

    fn tool_round(id: &str) -> [Message; 2] {
        [
            Message::new(
                Role::Assistant,
                vec![ContentBlock::tool_use(id, "lookup", json!({}))],
            ),
            Message::tool_results(vec![ToolResult::success(id, json!("ok"))]),
        ]
    }

    #[test]
    fn keeps_everything_under_the_limit() {
        let messages = vec![Message::user("a"), Message::assistant("b")];
        assert_eq!(SlidingWindow::new(5).window(&messages).len(), 2);
        assert_eq!(FullHistory.window(&messages), messages);
    }

    #[test]
    fn never_starts_on_tool_results() {
        let [call, result] = tool_round("c1");
        let messages = vec![
            Message::user("q"),
            call,
            result,
            Message::assistant("done"),
        ];

        let window = SlidingWindow::new(2).window(&messages);

        assert_eq!(window.len(), 3);
        assert_eq!(window[0].tool_uses()[0].id, "c1");
    }

    #[test]
    fn trims_plain_messages() {
        let messages: Vec<_> = (0..6).map(|i| Message::user(format!("m{i}"))).collect();
        let window = SlidingWindow::new(3).window(&messages);
        assert_eq!(window.first().map(Message::text).as_deref(), Some("m3"));
    }
}
