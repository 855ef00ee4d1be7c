//! Stateful agent owning one conversation history.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::config::AgentConfig;
use crate::agent_loop::events::{EventEmitter, EventSink};
use crate::agent_loop::runner::TurnRunner;
use crate::agent_loop::types::{LoopState, TurnResult};
use crate::error::Result;
use crate::types::{History, Message};

/// An agent: shared configuration plus its own append-only history.
pub struct Agent {
    config: Arc<AgentConfig>,
    history: History,
    state: LoopState,
    sink: Option<EventSink>,
    emitter: Option<EventEmitter>,
}

impl Agent {
    pub fn new(config: impl Into<Arc<AgentConfig>>) -> Self {
        Self {
            config: config.into(),
            history: History::new(),
            state: LoopState::AwaitingUserInput,
            sink: None,
            emitter: None,
        }
    }

    /// Resume from a previously stored history.
    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    /// Deliver events of each turn to `sink`, one run id per turn.
    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Reuse an existing emitter so events join an enclosing run.
    pub(crate) fn with_emitter(mut self, emitter: EventEmitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &Arc<AgentConfig> {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run one turn for a user message.
    pub async fn run_turn(&mut self, input: impl Into<String>) -> Result<TurnResult> {
        self.run_turn_with_cancel(input, CancellationToken::new())
            .await
    }

    /// Run one turn that stops early when `cancel` fires.
    pub async fn run_turn_with_cancel(
        &mut self,
        input: impl Into<String>,
        cancel: CancellationToken,
    ) -> Result<TurnResult> {
        let emitter = match &self.emitter {
            Some(emitter) => emitter.clone(),
            None => EventEmitter::new(Uuid::new_v4(), self.sink.clone()),
        };
        TurnRunner {
            config: &self.config,
            history: &mut self.history,
            state: &mut self.state,
            emitter,
            cancel,
        }
        .run(Message::user(input))
        .await
    }

    /// Run a turn and return the final text, failing on any early stop.
    pub async fn prompt(&mut self, input: impl Into<String>) -> Result<String> {
        let result = self.run_turn(input).await?.into_result()?;
        Ok(result.text.unwrap_or_default())
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.config.name)
            .field("messages", &self.history.len())
            .field("state", &self.state)
            .finish()
    }
}
