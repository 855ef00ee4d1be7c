//! Multi-agent workflow graphs.

pub mod edge;
#[allow(clippy::module_inception)]
pub mod graph;
pub mod node;
pub mod orchestrator;
pub mod swarm;

pub use edge::{AgentEdge, EdgeCondition};
pub use graph::AgentGraph;
pub use node::{AgentNode, NodeOutput, NodeStatus};
pub use orchestrator::{GraphRunResult, GraphStatus, Orchestrator};
pub use swarm::Swarm;
