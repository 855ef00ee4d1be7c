//! Error classification and recovery hints.

use serde::{Deserialize, Serialize};

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Protocol,
    Validation,
    ToolExecution,
    Provider,
    RateLimit,
    Budget,
    Configuration,
    Timeout,
    Canceled,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CorrectArguments,
    CheckToolImplementation,
    CheckConfiguration,
    IncreaseTimeout,
    RaiseLimit,
    Abort,
}
