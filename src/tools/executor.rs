//! Tool execution: validation, deadlines, cancellation and bounded batches.

use std::sync::Arc;
use std::time::Duration;

use futures::{stream, StreamExt};
use tokio_util::sync::CancellationToken;

use super::arguments::ToolArguments;
use super::registry::ToolRegistry;
use super::tool::ToolExecutionContext;
use super::types::ToolInvocation;
use crate::error::WeftError;
use crate::types::ToolResult;
use crate::util::timeout::with_timeout;

pub const DEFAULT_TOOL_CONCURRENCY: usize = 4;
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs tool invocations against a shared registry.
///
/// Every invocation yields exactly one [`ToolResult`]. Failures of any kind
/// are reported as `is_error` results rather than returned as errors.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    concurrency: usize,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            concurrency: DEFAULT_TOOL_CONCURRENCY,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Maximum invocations in flight during a batch. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Per-invocation deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate and run one invocation.
    pub async fn execute(
        &self,
        invocation: &ToolInvocation,
        cancel: &CancellationToken,
    ) -> ToolResult {
        let call_id = invocation.call_id.as_str();
        if cancel.is_cancelled() {
            return canceled_result(call_id);
        }

        let tool = match self.registry.validate(invocation) {
            Ok(tool) => tool,
            Err(err) => {
                tracing::warn!(call_id, tool = %invocation.tool_name, error = %err, "tool invocation rejected");
                return error_result(call_id, &err);
            }
        };

        let child = cancel.child_token();
        let ctx = ToolExecutionContext {
            call_id: invocation.call_id.clone(),
            tool_name: invocation.tool_name.clone(),
            cancel: child.clone(),
        };
        let args = ToolArguments::new(invocation.arguments.clone());
        let tool_name = invocation.tool_name.clone();
        let mut task = tokio::spawn(async move { tool.execute(&args, &ctx).await });

        let run = async {
            match (&mut task).await {
                Ok(outcome) => outcome,
                Err(join_err) if join_err.is_panic() => {
                    Err(WeftError::tool(&tool_name, "handler panicked"))
                }
                Err(_) => Err(WeftError::Canceled),
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WeftError::Canceled),
            outcome = with_timeout(self.timeout, run) => outcome,
        };

        match outcome {
            Ok(value) => {
                tracing::debug!(call_id, tool = %invocation.tool_name, "tool completed");
                ToolResult::success(call_id, value)
            }
            Err(err) => {
                // The handler may still be running; its eventual output is dropped.
                child.cancel();
                tracing::warn!(call_id, tool = %invocation.tool_name, error = %err, "tool failed");
                error_result(call_id, &err)
            }
        }
    }

    /// Run invocations with bounded concurrency. Results keep input order.
    pub async fn execute_batch(
        &self,
        invocations: &[ToolInvocation],
        cancel: &CancellationToken,
    ) -> Vec<ToolResult> {
        stream::iter(invocations)
            .map(|invocation| self.execute(invocation, cancel))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

fn error_result(call_id: &str, err: &WeftError) -> ToolResult {
    ToolResult::error(call_id, err.kind(), err.to_string())
}

/// Result recorded for an invocation that was canceled before completing.
pub fn canceled_result(call_id: &str) -> ToolResult {
    error_result(call_id, &WeftError::Canceled)
}
