use tokio_util::sync::CancellationToken;

use super::super::events::{AgentEvent, EventEmitter};
use super::super::types::TurnMetrics;
use crate::agent::AgentConfig;
use crate::error::WeftError;
use crate::provider::{ModelRequest, ModelResponse};
use crate::types::History;
use crate::util::timeout::with_timeout;

/// Query the provider with retry, a per-attempt deadline and cancellation.
///
/// Returns `Canceled` unwrapped so the caller can end the turn cleanly;
/// every other failure is wrapped in `ModelQueryFailed`.
pub(super) async fn query_model(
    config: &AgentConfig,
    history: &History,
    emitter: &EventEmitter,
    cancel: &CancellationToken,
    metrics: &mut TurnMetrics,
) -> Result<ModelResponse, WeftError> {
    let request = ModelRequest {
        agent_name: config.name.clone(),
        system_prompt: config.system_prompt.clone(),
        messages: config.conversation.window(history.messages()),
        tools: config.tools.definitions(),
    };
    let provider = config.provider.as_ref();
    let timeout = config.limits.model_timeout;
    let request = &request;

    let attempts = config.limits.retry.execute_with_hook(
        || async move {
            let response = with_timeout(timeout, provider.complete(request)).await?;
            response.validate()?;
            Ok(response)
        },
        |attempt, delay, err| {
            metrics.retries += 1;
            emitter.emit(AgentEvent::RetryScheduled {
                agent: config.name.clone(),
                attempt,
                delay_ms: delay.as_millis() as u64,
                error: err.to_string(),
            });
        },
    );

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(agent = %config.name, "model query canceled");
            Err(WeftError::Canceled)
        }
        outcome = attempts => outcome.map_err(|err| {
            tracing::warn!(agent = %config.name, provider = provider.name(), error = %err, "model query failed");
            WeftError::model_query_failed(&config.name, err)
        }),
    }
}
