//! Per-agent execution limits.

use std::time::Duration;

use crate::config::RuntimeConfig;
use crate::tools::executor::{DEFAULT_TOOL_CONCURRENCY, DEFAULT_TOOL_TIMEOUT};
use crate::util::retry::RetryPolicy;

pub const DEFAULT_MAX_ITERATIONS: usize = 10;
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeouts, concurrency and retry settings applied during a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopLimits {
    pub tool_concurrency: usize,
    pub tool_timeout: Duration,
    pub model_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for LoopLimits {
    fn default() -> Self {
        Self {
            tool_concurrency: DEFAULT_TOOL_CONCURRENCY,
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl LoopLimits {
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            tool_concurrency: config.tool_concurrency.max(1),
            tool_timeout: Duration::from_millis(config.tool_timeout_ms),
            model_timeout: Duration::from_millis(config.model_timeout_ms),
            retry: RetryPolicy::from_config(config),
        }
    }

    /// Limits from the process-wide config (file and `WEFT_*` env vars).
    pub fn from_env() -> Self {
        Self::from_config(RuntimeConfig::global())
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn with_tool_concurrency(mut self, concurrency: usize) -> Self {
        self.tool_concurrency = concurrency.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_runtime_config_defaults() {
        assert_eq!(LoopLimits::from_config(&RuntimeConfig::default()), LoopLimits::default());
    }

    #[test]
    fn from_config_converts_milliseconds() {
        let config = RuntimeConfig {
            tool_timeout_ms: 250,
            tool_concurrency: 0,
            ..RuntimeConfig::default()
        };
        let limits = LoopLimits::from_config(&config);
        assert_eq!(limits.tool_timeout, Duration::from_millis(250));
        assert_eq!(limits.tool_concurrency, 1);
    }
}
