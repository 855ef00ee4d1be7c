//! Error types for weft.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all weft operations.
#[derive(Error, Debug)]
pub enum WeftError {
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Schema violation in tool '{tool}' at '{field}': {reason}")]
    SchemaViolation {
        tool: String,
        field: String,
        reason: String,
    },

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Duplicate tool name: {0}")]
    DuplicateToolName(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("Model query failed for agent '{agent}': {source}")]
    ModelQueryFailed {
        agent: String,
        #[source]
        source: Box<WeftError>,
    },

    #[error("Iteration budget exhausted after {max_iterations} model queries")]
    IterationBudgetExhausted {
        max_iterations: usize,
        partial: Option<String>,
    },

    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(String),

    #[error("Edge {source_id} -> {target_id} references unknown node '{missing}'")]
    DanglingEdgeReference {
        source_id: String,
        target_id: String,
        missing: String,
    },

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Graph hop limit exceeded (max_hops={limit})")]
    GraphHopLimitExceeded { limit: usize },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Canceled")]
    Canceled,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl WeftError {
    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Create a schema violation for a tool argument.
    pub fn schema_violation(
        tool: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::SchemaViolation {
            tool: tool.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a tool execution error, typically returned from a handler.
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Wrap a provider error as a loop-level failure.
    pub fn model_query_failed(agent: impl Into<String>, source: WeftError) -> Self {
        Self::ModelQueryFailed {
            agent: agent.into(),
            source: Box::new(source),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Protocol(_) => ErrorCategory::Protocol,
            Self::SchemaViolation { .. } | Self::InvalidArgument(_) => ErrorCategory::Validation,
            Self::ToolNotFound(_) | Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            Self::ProviderUnavailable(_) | Self::InvalidResponse(_) | Self::ModelQueryFailed { .. } => {
                ErrorCategory::Provider
            }
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::IterationBudgetExhausted { .. } | Self::GraphHopLimitExceeded { .. } => {
                ErrorCategory::Budget
            }
            Self::DuplicateToolName(_)
            | Self::DuplicateNodeId(_)
            | Self::DanglingEdgeReference { .. }
            | Self::UnknownNode(_)
            | Self::Configuration(_)
            | Self::TomlParse(_) => ErrorCategory::Configuration,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Canceled => ErrorCategory::Canceled,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether the loop may retry the operation that produced this error.
    ///
    /// Only provider availability and rate limiting qualify; every other
    /// provider failure is surfaced immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable(_) | Self::RateLimited { .. }
        )
    }

    /// Server-suggested delay before the next attempt, if any.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms } => *retry_after_ms,
            _ => None,
        }
    }

    /// Short machine-readable kind, used in tool error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Protocol(_) => "protocol",
            Self::SchemaViolation { .. } => "schema_violation",
            Self::ToolNotFound(_) => "tool_not_found",
            Self::ToolExecution { .. } => "tool_execution",
            Self::DuplicateToolName(_) => "duplicate_tool_name",
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::RateLimited { .. } => "rate_limited",
            Self::InvalidResponse(_) => "invalid_response",
            Self::ModelQueryFailed { .. } => "model_query_failed",
            Self::IterationBudgetExhausted { .. } => "iteration_budget_exhausted",
            Self::DuplicateNodeId(_) => "duplicate_node_id",
            Self::DanglingEdgeReference { .. } => "dangling_edge_reference",
            Self::UnknownNode(_) => "unknown_node",
            Self::GraphHopLimitExceeded { .. } => "graph_hop_limit_exceeded",
            Self::Timeout(_) => "timeout",
            Self::Canceled => "canceled",
            Self::Configuration(_) => "configuration",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::TomlParse(_) => "config_parse",
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::RateLimit | ErrorCategory::Provider if self.is_retryable() => {
                RecoverySuggestion::RetryWithBackoff
            }
            ErrorCategory::RateLimit => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Validation => RecoverySuggestion::CorrectArguments,
            ErrorCategory::ToolExecution => RecoverySuggestion::CheckToolImplementation,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Budget => RecoverySuggestion::RaiseLimit,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            _ => RecoverySuggestion::Abort,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WeftError>;
