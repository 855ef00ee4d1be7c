//! Edges and the conditions that gate them.

use std::sync::Arc;

use super::node::NodeOutput;
use crate::error::{Result, WeftError};

type Predicate = dyn Fn(&NodeOutput) -> bool + Send + Sync;

/// Decides whether a node's output is routed along an edge.
#[derive(Clone)]
pub enum EdgeCondition {
    /// Output text contains the substring (case-sensitive).
    ///
    /// This is a plain substring test: `contains("ok")` also accepts
    /// "not ok". Use [`EdgeCondition::regex`] with anchors for exact matches.
    Contains(String),
    /// Output text matches the pattern.
    Regex(regex::Regex),
    Predicate(Arc<Predicate>),
}

impl EdgeCondition {
    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        regex::Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| WeftError::InvalidArgument(format!("invalid edge pattern: {e}")))
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&NodeOutput) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    pub fn matches(&self, output: &NodeOutput) -> bool {
        let text = output.text_or_empty();
        match self {
            Self::Contains(needle) => text.contains(needle.as_str()),
            Self::Regex(regex) => regex.is_match(text),
            Self::Predicate(f) => f(output),
        }
    }
}

impl std::fmt::Debug for EdgeCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contains(needle) => f.debug_tuple("Contains").field(needle).finish(),
            Self::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Directed edge between two nodes; unconditional when `condition` is `None`.
#[derive(Debug, Clone)]
pub struct AgentEdge {
    pub source: String,
    pub target: String,
    pub condition: Option<EdgeCondition>,
}

impl AgentEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            condition: None,
        }
    }

    pub fn when(mut self, condition: EdgeCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn is_satisfied(&self, output: &NodeOutput) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition.matches(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::NodeStatus;

    fn output(text: &str) -> NodeOutput {
        NodeOutput {
            node_id: "a".into(),
            hop: 1,
            path: vec![0],
            status: NodeStatus::Completed,
            input: String::new(),
            text: Some(text.into()),
            error: None,
            is_leaf: false,
            iterations: 1,
        }
    }

    #[test]
    fn unconditional_edge_always_passes() {
        assert!(AgentEdge::new("a", "b").is_satisfied(&output("")));
    }

    #[test]
    fn contains_is_substring_match() {
        let edge = AgentEdge::new("a", "b").when(EdgeCondition::contains("approved"));
        assert!(edge.is_satisfied(&output("status: approved")));
        assert!(!edge.is_satisfied(&output("status: rejected")));
    }

    #[test]
    fn anchored_regex_rejects_negated_text() {
        let condition = EdgeCondition::regex(r"^ok\b").unwrap();
        assert!(condition.matches(&output("ok, shipping")));
        assert!(!condition.matches(&output("not ok")));
    }

    #[test]
    fn invalid_regex_is_invalid_argument() {
        assert!(matches!(
            EdgeCondition::regex("("),
            Err(WeftError::InvalidArgument(_))
        ));
    }

    #[test]
    fn predicate_sees_whole_output() {
        let condition = EdgeCondition::predicate(|out| out.iterations > 1);
        assert!(!condition.matches(&output("x")));
    }
}
