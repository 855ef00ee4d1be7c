//! Core turn types for the agent loop.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::WeftError;
use crate::types::{Message, Usage};

/// Unique run identifier.
pub type RunId = Uuid;

/// How a turn ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TurnStatus {
    Completed,
    IterationBudgetExhausted,
    Canceled,
}

/// Where an agent currently is in its loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoopState {
    AwaitingUserInput,
    ModelQuery,
    ToolDispatch,
    Finalized,
}

/// Counters collected over one turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnMetrics {
    pub model_queries: usize,
    pub retries: usize,
    pub tool_calls: usize,
    pub tool_errors: usize,
    pub usage: Usage,
    pub duration_ms: u64,
}

/// Outcome of [`Agent::run_turn`](crate::agent::Agent::run_turn).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub run_id: RunId,
    pub status: TurnStatus,
    /// Final answer, or the last assistant text when the turn stopped early.
    pub text: Option<String>,
    /// Messages appended to history during this turn, user message first.
    pub new_messages: Vec<Message>,
    /// Model queries performed.
    pub iterations: usize,
    pub metrics: TurnMetrics,
}

impl TurnResult {
    pub fn is_completed(&self) -> bool {
        self.status == TurnStatus::Completed
    }

    /// Convert non-completed outcomes into errors.
    pub fn into_result(self) -> Result<TurnResult, WeftError> {
        match self.status {
            TurnStatus::Completed => Ok(self),
            TurnStatus::IterationBudgetExhausted => Err(WeftError::IterationBudgetExhausted {
                max_iterations: self.iterations,
                partial: self.text,
            }),
            TurnStatus::Canceled => Err(WeftError::Canceled),
        }
    }
}
