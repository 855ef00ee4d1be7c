//! Run event types and the emitter that stamps them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use super::types::{RunId, TurnStatus};
use crate::types::ToolResult;

/// Events emitted by agent turns and graph runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentEvent {
    // -- Turn boundaries --
    TurnStart {
        agent: String,
    },
    TurnEnd {
        agent: String,
        status: TurnStatus,
        iterations: usize,
    },
    TurnFailed {
        agent: String,
        error: String,
    },

    // -- Model queries --
    ModelQuery {
        agent: String,
        iteration: usize,
        messages: usize,
    },
    RetryScheduled {
        agent: String,
        attempt: u32,
        delay_ms: u64,
        error: String,
    },
    IterationBudgetExhausted {
        agent: String,
        max_iterations: usize,
    },

    // -- Tools --
    ToolDispatched {
        agent: String,
        call_id: String,
        tool_name: String,
        arguments: serde_json::Value,
    },
    ToolResult {
        agent: String,
        result: ToolResult,
    },

    // -- Graph runs --
    GraphNodeStart {
        node_id: String,
        hop: usize,
    },
    GraphNodeEnd {
        node_id: String,
        hop: usize,
        failed: bool,
    },
    GraphHop {
        from: String,
        to: String,
    },
    GraphHopLimitReached {
        max_hops: usize,
        pending: usize,
    },
}

impl AgentEvent {
    /// The serialized `type` tag, e.g. `"tool_dispatched"`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Envelope for emitted events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub run_id: RunId,
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub event: AgentEvent,
}

/// Callback receiving every event of a run.
pub type EventSink = Arc<dyn Fn(EventEnvelope) + Send + Sync>;

/// Stamps events with run id and a sequence number before delivery.
///
/// Clones share the counter, so concurrent graph branches still produce a
/// strictly increasing sequence.
#[derive(Clone)]
pub struct EventEmitter {
    run_id: RunId,
    seq: Arc<AtomicU64>,
    sink: Option<EventSink>,
}

impl EventEmitter {
    pub fn new(run_id: RunId, sink: Option<EventSink>) -> Self {
        Self {
            run_id,
            seq: Arc::new(AtomicU64::new(1)),
            sink,
        }
    }

    /// Emitter that drops every event.
    pub fn disabled() -> Self {
        Self::new(RunId::nil(), None)
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn emit(&self, event: AgentEvent) {
        let Some(sink) = &self.sink else {
            return;
        };
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        (sink)(EventEnvelope {
            run_id: self.run_id,
            seq,
            timestamp: Utc::now(),
            event,
        });
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("run_id", &self.run_id)
            .field("seq", &self.seq.load(Ordering::SeqCst))
            .field("sink", &self.sink.as_ref().map(|_| ".."))
            .finish()
    }
}
