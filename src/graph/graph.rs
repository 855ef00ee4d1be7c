//! Graph structure: nodes indexed by id plus an ordered edge list.

use std::collections::{HashMap, HashSet, VecDeque};

use super::edge::AgentEdge;
use super::node::AgentNode;
use crate::error::{Result, WeftError};

/// Workflow graph. Construction errors surface here, never during a run.
///
/// Cycles are allowed; runs bound them with a hop limit.
#[derive(Debug, Clone, Default)]
pub struct AgentGraph {
    nodes: HashMap<String, AgentNode>,
    node_order: Vec<String>,
    edges: Vec<AgentEdge>,
}

impl AgentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: AgentNode) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(WeftError::DuplicateNodeId(node.id));
        }
        self.node_order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Both endpoints must already be nodes of the graph.
    pub fn add_edge(&mut self, edge: AgentEdge) -> Result<()> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(WeftError::DanglingEdgeReference {
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&AgentNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> &[String] {
        &self.node_order
    }

    pub fn edges(&self) -> &[AgentEdge] {
        &self.edges
    }

    /// Outgoing edges of `id` in declaration order.
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a AgentEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.source == id)
    }

    /// Distinct successor nodes of `id`, in edge declaration order.
    ///
    /// Edge conditions are ignored; this is the static shape of the graph.
    pub fn neighbors(&self, id: &str) -> Vec<&AgentNode> {
        let mut seen = HashSet::new();
        self.edges_from(id)
            .filter(|edge| seen.insert(edge.target.as_str()))
            .filter_map(|edge| self.nodes.get(&edge.target))
            .collect()
    }

    /// True when some node can reach itself, self-loops included.
    pub fn has_cycle(&self) -> bool {
        self.topological_sort().is_err()
    }

    /// Node ids ordered so every edge points forward.
    ///
    /// Ties keep insertion order. A cyclic graph has no such order and
    /// yields a configuration error naming the nodes left unordered.
    pub fn topological_sort(&self) -> Result<Vec<String>> {
        let mut in_degree: HashMap<&str, usize> =
            self.node_order.iter().map(|id| (id.as_str(), 0)).collect();
        for edge in &self.edges {
            if let Some(degree) = in_degree.get_mut(edge.target.as_str()) {
                *degree += 1;
            }
        }

        let mut ready: VecDeque<&str> = self
            .node_order
            .iter()
            .map(String::as_str)
            .filter(|id| in_degree[id] == 0)
            .collect();
        let mut sorted = Vec::with_capacity(self.node_order.len());

        while let Some(id) = ready.pop_front() {
            sorted.push(id.to_string());
            for edge in self.edges_from(id) {
                if let Some(degree) = in_degree.get_mut(edge.target.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(edge.target.as_str());
                    }
                }
            }
        }

        if sorted.len() < self.node_order.len() {
            let stuck: Vec<&str> = self
                .node_order
                .iter()
                .map(String::as_str)
                .filter(|id| in_degree[id] > 0)
                .collect();
            return Err(WeftError::Configuration(format!(
                "graph has a cycle through: {}",
                stuck.join(", ")
            )));
        }
        Ok(sorted)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentConfig;
    use crate::provider::ScriptedProvider;
    use std::sync::Arc;

    fn node(id: &str) -> AgentNode {
        let config = AgentConfig::builder()
            .name(id)
            .provider(Arc::new(ScriptedProvider::new("script")))
            .build();
        AgentNode::new(id, config)
    }

    #[test]
    fn duplicate_node_id_rejected() {
        let mut graph = AgentGraph::new();
        graph.add_node(node("a")).unwrap();
        let err = graph.add_node(node("a")).unwrap_err();
        assert!(matches!(err, WeftError::DuplicateNodeId(id) if id == "a"));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn dangling_edge_rejected_with_missing_endpoint() {
        let mut graph = AgentGraph::new();
        graph.add_node(node("a")).unwrap();
        let err = graph.add_edge(AgentEdge::new("a", "ghost")).unwrap_err();
        match err {
            WeftError::DanglingEdgeReference { missing, .. } => assert_eq!(missing, "ghost"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn edges_from_keeps_declaration_order() {
        let mut graph = AgentGraph::new();
        for id in ["a", "b", "c"] {
            graph.add_node(node(id)).unwrap();
        }
        graph.add_edge(AgentEdge::new("a", "c")).unwrap();
        graph.add_edge(AgentEdge::new("b", "a")).unwrap();
        graph.add_edge(AgentEdge::new("a", "b")).unwrap();
        let targets: Vec<_> = graph.edges_from("a").map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["c", "b"]);
    }

    fn chain(ids: &[&str], edges: &[(&str, &str)]) -> AgentGraph {
        let mut graph = AgentGraph::new();
        for id in ids {
            graph.add_node(node(id)).unwrap();
        }
        for (from, to) in edges {
            graph.add_edge(AgentEdge::new(*from, *to)).unwrap();
        }
        graph
    }

    #[test]
    fn neighbors_are_distinct_targets() {
        let graph = chain(
            &["researcher", "writer", "reviewer"],
            &[
                ("researcher", "writer"),
                ("researcher", "reviewer"),
                ("researcher", "writer"),
            ],
        );
        let ids: Vec<_> = graph.neighbors("researcher").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["writer", "reviewer"]);
        assert!(graph.neighbors("reviewer").is_empty());
        assert!(graph.neighbors("ghost").is_empty());
    }

    #[test]
    fn topological_sort_puts_sources_first() {
        let graph = chain(
            &["reviewer", "writer", "researcher"],
            &[("researcher", "writer"), ("writer", "reviewer")],
        );
        assert!(!graph.has_cycle());
        assert_eq!(
            graph.topological_sort().unwrap(),
            vec!["researcher", "writer", "reviewer"]
        );
    }

    #[test]
    fn mutual_edges_form_a_cycle() {
        let graph = chain(&["a", "b", "c"], &[("a", "b"), ("b", "a"), ("b", "c")]);
        assert!(graph.has_cycle());
        match graph.topological_sort().unwrap_err() {
            WeftError::Configuration(msg) => assert!(msg.contains("a, b"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let graph = chain(&["a"], &[("a", "a")]);
        assert!(graph.has_cycle());
    }
}
