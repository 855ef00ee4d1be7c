//! Retry with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use crate::config::RuntimeConfig;
use crate::error::WeftError;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Policy that makes a single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            max_attempts: config.retry_max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.retry_initial_backoff_ms),
            max_backoff: Duration::from_millis(config.retry_max_backoff_ms),
            ..Self::default()
        }
    }

    /// Execute an async operation with retry.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, WeftError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, WeftError>>,
    {
        self.execute_with_hook(operation, |_, _, _| {}).await
    }

    /// Execute with retry, calling `on_retry(attempt, delay, error)` before each sleep.
    ///
    /// Only errors with [`WeftError::is_retryable`] are retried. A server
    /// supplied `retry_after_ms` replaces the computed backoff, capped at
    /// `max_backoff`.
    pub async fn execute_with_hook<F, Fut, T, H>(
        &self,
        mut operation: F,
        mut on_retry: H,
    ) -> Result<T, WeftError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, WeftError>>,
        H: FnMut(u32, Duration, &WeftError),
    {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = self.initial_backoff;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !err.is_retryable() || attempt >= max_attempts {
                return Err(err);
            }

            let delay = match err.retry_after_ms() {
                Some(ms) => Duration::from_millis(ms).min(self.max_backoff),
                None => {
                    // Jitter: 75%-125% of backoff
                    let jitter_factor = 0.75 + (rand_factor() * 0.5);
                    Duration::from_secs_f64(backoff.as_secs_f64() * jitter_factor)
                }
            };

            tracing::warn!(
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying after error"
            );
            on_retry(attempt, delay, &err);
            tokio::time::sleep(delay).await;

            backoff = Duration::from_secs_f64(
                (backoff.as_secs_f64() * self.multiplier).min(self.max_backoff.as_secs_f64()),
            );
        }
    }
}

/// Simple pseudo-random factor [0, 1) without pulling in rand crate.
fn rand_factor() -> f64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    std::thread::current().id().hash(&mut hasher);

    let hash = hasher.finish();
    (hash % 10000) as f64 / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_never_allows_zero_attempts() {
        let config = RuntimeConfig {
            retry_max_attempts: 0,
            ..RuntimeConfig::default()
        };
        assert_eq!(RetryPolicy::from_config(&config).max_attempts, 1);
    }

    #[test]
    fn rand_factor_is_in_unit_interval() {
        for _ in 0..32 {
            let f = rand_factor();
            assert!((0.0..1.0).contains(&f));
        }
    }
}
