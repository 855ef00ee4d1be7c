//! Graph nodes and per-execution node outputs.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::agent::AgentConfig;
use crate::agent_loop::TurnStatus;

pub const DEFAULT_NODE_TYPE: &str = "agent";

/// A node in an agent graph. Each execution forks a fresh agent from `agent`.
#[derive(Debug, Clone)]
pub struct AgentNode {
    pub id: String,
    pub node_type: String,
    /// Local settings, readable by edge predicates and callers.
    pub config: HashMap<String, serde_json::Value>,
    pub agent: Arc<AgentConfig>,
}

impl AgentNode {
    pub fn new(id: impl Into<String>, agent: impl Into<Arc<AgentConfig>>) -> Self {
        Self {
            id: id.into(),
            node_type: DEFAULT_NODE_TYPE.to_string(),
            config: HashMap::new(),
            agent: agent.into(),
        }
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = node_type.into();
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }
}

/// How one node execution ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeStatus {
    Completed,
    IterationBudgetExhausted,
    Failed,
    Canceled,
}

impl From<TurnStatus> for NodeStatus {
    fn from(status: TurnStatus) -> Self {
        match status {
            TurnStatus::Completed => Self::Completed,
            TurnStatus::IterationBudgetExhausted => Self::IterationBudgetExhausted,
            TurnStatus::Canceled => Self::Canceled,
        }
    }
}

/// Output of one node execution within a graph run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOutput {
    pub node_id: String,
    /// 1-based position of this execution in the run's hop count.
    pub hop: usize,
    /// Route from the entry node: successor indices in edge-declaration order.
    pub path: Vec<usize>,
    pub status: NodeStatus,
    pub input: String,
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True when no successor ran after this execution, either because no
    /// edge accepted the output or because the hop limit cut them off.
    pub is_leaf: bool,
    pub iterations: usize,
}

impl NodeOutput {
    pub fn is_completed(&self) -> bool {
        self.status == NodeStatus::Completed
    }

    /// Output text, or the empty string.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
