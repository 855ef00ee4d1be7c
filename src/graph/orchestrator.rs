//! Graph traversal: hop-bounded, concurrent fan-out over agent nodes.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::graph::AgentGraph;
use super::node::{NodeOutput, NodeStatus};
use crate::agent::Agent;
use crate::agent_loop::events::{AgentEvent, EventEmitter, EventSink};
use crate::agent_loop::types::RunId;
use crate::config::RuntimeConfig;
use crate::error::{Result, WeftError};

pub const DEFAULT_MAX_HOPS: usize = 32;

/// How a graph run ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GraphStatus {
    Completed,
    HopLimitExceeded,
    Canceled,
}

/// Aggregate of every node execution in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRunResult {
    pub run_id: RunId,
    pub status: GraphStatus,
    /// Ordered by branch path: entry first, then successors depth-first.
    pub outputs: Vec<NodeOutput>,
    pub hops: usize,
    pub max_hops: usize,
}

impl GraphRunResult {
    /// Outputs that did not route anywhere.
    pub fn leaves(&self) -> impl Iterator<Item = &NodeOutput> {
        self.outputs.iter().filter(|o| o.is_leaf)
    }

    /// First output recorded for `node_id` in path order.
    pub fn get(&self, node_id: &str) -> Option<&NodeOutput> {
        self.outputs.iter().find(|o| o.node_id == node_id)
    }

    /// Every execution of `node_id`, in path order.
    pub fn executions_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a NodeOutput> + 'a {
        self.outputs.iter().filter(move |o| o.node_id == node_id)
    }

    pub fn executed(&self, node_id: &str) -> bool {
        self.get(node_id).is_some()
    }

    /// Turn hop-limit and cancellation outcomes into errors.
    pub fn into_result(self) -> Result<GraphRunResult> {
        match self.status {
            GraphStatus::Completed => Ok(self),
            GraphStatus::HopLimitExceeded => Err(WeftError::GraphHopLimitExceeded {
                limit: self.max_hops,
            }),
            GraphStatus::Canceled => Err(WeftError::Canceled),
        }
    }
}

struct Scheduled {
    node_id: String,
    input: String,
    path: Vec<usize>,
    hop: usize,
}

/// Runs an [`AgentGraph`] from an entry node.
#[derive(Clone)]
pub struct Orchestrator {
    graph: Arc<AgentGraph>,
    max_hops: usize,
    sink: Option<EventSink>,
}

impl Orchestrator {
    pub fn new(graph: impl Into<Arc<AgentGraph>>) -> Self {
        Self {
            graph: graph.into(),
            max_hops: DEFAULT_MAX_HOPS,
            sink: None,
        }
    }

    pub fn from_config(graph: impl Into<Arc<AgentGraph>>, config: &RuntimeConfig) -> Self {
        Self::new(graph).with_max_hops(config.max_graph_hops)
    }

    /// Maximum node executions per run. Zero is treated as one.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops.max(1);
        self
    }

    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn graph(&self) -> &Arc<AgentGraph> {
        &self.graph
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    pub async fn run(&self, entry: &str, input: impl Into<String>) -> Result<GraphRunResult> {
        self.run_with_cancel(entry, input, CancellationToken::new())
            .await
    }

    /// Traverse from `entry`, feeding each node's text to its successors.
    ///
    /// Only completed nodes route. A node with no successor actually
    /// scheduled, whether its edges rejected the output or the hop limit cut
    /// them off, is a leaf. Branch failures are recorded, not raised.
    pub async fn run_with_cancel(
        &self,
        entry: &str,
        input: impl Into<String>,
        cancel: CancellationToken,
    ) -> Result<GraphRunResult> {
        if !self.graph.contains(entry) {
            return Err(WeftError::UnknownNode(entry.to_string()));
        }

        let emitter = EventEmitter::new(Uuid::new_v4(), self.sink.clone());
        let mut in_flight = FuturesUnordered::new();
        let mut outputs = Vec::new();
        let mut hops = 1;
        let mut limit_hit = false;

        in_flight.push(self.execute_node(
            Scheduled {
                node_id: entry.to_string(),
                input: input.into(),
                path: vec![0],
                hop: hops,
            },
            emitter.clone(),
            cancel.child_token(),
        ));

        while let Some(mut output) = in_flight.next().await {
            let successors: Vec<(usize, String)> = if output.is_completed() {
                self.graph
                    .edges_from(&output.node_id)
                    .enumerate()
                    .filter(|(_, edge)| edge.is_satisfied(&output))
                    .map(|(index, edge)| (index, edge.target.clone()))
                    .collect()
            } else {
                Vec::new()
            };
            let mut scheduled = 0;
            if !cancel.is_cancelled() {
                let mut dropped = 0;
                for (index, target) in successors {
                    if hops >= self.max_hops {
                        dropped += 1;
                        continue;
                    }
                    hops += 1;
                    scheduled += 1;
                    emitter.emit(AgentEvent::GraphHop {
                        from: output.node_id.clone(),
                        to: target.clone(),
                    });
                    let mut path = output.path.clone();
                    path.push(index);
                    in_flight.push(self.execute_node(
                        Scheduled {
                            node_id: target,
                            input: output.text_or_empty().to_string(),
                            path,
                            hop: hops,
                        },
                        emitter.clone(),
                        cancel.child_token(),
                    ));
                }
                if dropped > 0 {
                    limit_hit = true;
                    tracing::warn!(max_hops = self.max_hops, dropped, node = %output.node_id, "graph hop limit reached");
                    emitter.emit(AgentEvent::GraphHopLimitReached {
                        max_hops: self.max_hops,
                        pending: dropped,
                    });
                }
            }
            output.is_leaf = scheduled == 0;
            outputs.push(output);
        }

        outputs.sort_by(|a, b| a.path.cmp(&b.path));
        let status = if cancel.is_cancelled() {
            GraphStatus::Canceled
        } else if limit_hit {
            GraphStatus::HopLimitExceeded
        } else {
            GraphStatus::Completed
        };
        tracing::debug!(%status, hops, outputs = outputs.len(), "graph run finished");

        Ok(GraphRunResult {
            run_id: emitter.run_id(),
            status,
            outputs,
            hops,
            max_hops: self.max_hops,
        })
    }

    async fn execute_node(
        &self,
        scheduled: Scheduled,
        emitter: EventEmitter,
        cancel: CancellationToken,
    ) -> NodeOutput {
        let Scheduled {
            node_id,
            input,
            path,
            hop,
        } = scheduled;
        let mut output = NodeOutput {
            node_id,
            hop,
            path,
            status: NodeStatus::Failed,
            input,
            text: None,
            error: None,
            is_leaf: true,
            iterations: 0,
        };

        let Some(node) = self.graph.node(&output.node_id) else {
            output.error = Some(WeftError::UnknownNode(output.node_id.clone()).to_string());
            return output;
        };

        emitter.emit(AgentEvent::GraphNodeStart {
            node_id: output.node_id.clone(),
            hop,
        });
        tracing::debug!(node = %output.node_id, hop, "graph node started");

        let mut agent = Agent::new(Arc::clone(&node.agent)).with_emitter(emitter.clone());
        match agent.run_turn_with_cancel(output.input.clone(), cancel).await {
            Ok(turn) => {
                output.status = turn.status.into();
                output.text = turn.text;
                output.iterations = turn.iterations;
            }
            Err(err) => {
                tracing::warn!(node = %output.node_id, hop, error = %err, "graph node failed");
                output.error = Some(err.to_string());
            }
        }

        emitter.emit(AgentEvent::GraphNodeEnd {
            node_id: output.node_id.clone(),
            hop,
            failed: output.status == NodeStatus::Failed,
        });
        output
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("graph", &self.graph)
            .field("max_hops", &self.max_hops)
            .finish()
    }
}
