//! Swarm: a flat group of agents addressed by id, without edges.
//!
//! Each member keeps its own history across calls.

use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::agent::{Agent, AgentConfig};
use crate::agent_loop::events::EventSink;
use crate::agent_loop::types::TurnResult;
use crate::error::{Result, WeftError};

#[derive(Default)]
pub struct Swarm {
    members: Vec<(String, Agent)>,
    sink: Option<EventSink>,
}

impl Swarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver events of members added after this call to `sink`.
    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn add_agent(
        &mut self,
        id: impl Into<String>,
        config: impl Into<Arc<AgentConfig>>,
    ) -> Result<()> {
        let id = id.into();
        if self.contains(&id) {
            return Err(WeftError::DuplicateNodeId(id));
        }
        let mut agent = Agent::new(config);
        if let Some(sink) = &self.sink {
            agent = agent.with_event_sink(Arc::clone(sink));
        }
        self.members.push((id, agent));
        Ok(())
    }

    pub fn remove_agent(&mut self, id: &str) -> Option<Agent> {
        let index = self.members.iter().position(|(member, _)| member == id)?;
        Some(self.members.remove(index).1)
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.members
            .iter()
            .find(|(member, _)| member == id)
            .map(|(_, agent)| agent)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.agent(id).is_some()
    }

    /// Member ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Run one turn on a single member.
    pub async fn send_to(&mut self, id: &str, input: impl Into<String>) -> Result<TurnResult> {
        let agent = self
            .members
            .iter_mut()
            .find(|(member, _)| member == id)
            .map(|(_, agent)| agent)
            .ok_or_else(|| WeftError::UnknownNode(id.to_string()))?;
        agent.run_turn(input).await
    }

    /// Run the same input on every member concurrently.
    ///
    /// Results come back in insertion order; one member failing does not
    /// stop the others.
    pub async fn broadcast(&mut self, input: impl Into<String>) -> Vec<(String, Result<TurnResult>)> {
        self.broadcast_with_cancel(input, CancellationToken::new())
            .await
    }

    pub async fn broadcast_with_cancel(
        &mut self,
        input: impl Into<String>,
        cancel: CancellationToken,
    ) -> Vec<(String, Result<TurnResult>)> {
        let input = input.into();
        tracing::debug!(members = self.members.len(), "swarm broadcast");
        let turns = self.members.iter_mut().map(|(id, agent)| {
            let input = input.clone();
            let cancel = cancel.child_token();
            async move { (id.clone(), agent.run_turn_with_cancel(input, cancel).await) }
        });
        join_all(turns).await
    }
}

impl std::fmt::Debug for Swarm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Swarm")
            .field("members", &self.ids().collect::<Vec<_>>())
            .field("sink", &self.sink.as_ref().map(|_| ".."))
            .finish()
    }
}
