//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::WeftError;

/// Wrap a fallible future with a deadline, mapping expiry to [`WeftError::Timeout`].
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, WeftError>>,
) -> Result<T, WeftError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(WeftError::Timeout(duration.as_millis() as u64)),
    }
}
