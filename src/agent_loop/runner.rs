//! Turn runner: drives model queries and tool dispatch until the turn ends.

mod llm_phase;
mod tool_phase;

use std::time::Instant;

use tokio_util::sync::CancellationToken;

use super::events::{AgentEvent, EventEmitter};
use super::types::{LoopState, TurnMetrics, TurnResult, TurnStatus};
use crate::agent::AgentConfig;
use crate::error::{Result, WeftError};
use crate::tools::ToolExecutor;
use crate::types::{History, Message, Role};

/// Borrowed view of one agent for the duration of a turn.
pub(crate) struct TurnRunner<'a> {
    pub(crate) config: &'a AgentConfig,
    pub(crate) history: &'a mut History,
    pub(crate) state: &'a mut LoopState,
    pub(crate) emitter: EventEmitter,
    pub(crate) cancel: CancellationToken,
}

impl TurnRunner<'_> {
    /// Run the turn. Every exit, successful or not, leaves the agent `Finalized`.
    pub(crate) async fn run(self, input: Message) -> Result<TurnResult> {
        let Self {
            config,
            history,
            state,
            emitter,
            cancel,
        } = self;
        let outcome = drive(config, history, state, &emitter, &cancel, input).await;
        if let Err(err) = &outcome {
            *state = LoopState::Finalized;
            tracing::warn!(agent = %config.name, error = %err, "turn failed");
            emitter.emit(AgentEvent::TurnFailed {
                agent: config.name.clone(),
                error: err.to_string(),
            });
        }
        outcome
    }
}

async fn drive(
    config: &AgentConfig,
    history: &mut History,
    state: &mut LoopState,
    emitter: &EventEmitter,
    cancel: &CancellationToken,
    input: Message,
) -> Result<TurnResult> {
    let agent = config.name.as_str();
    let started = Instant::now();

    if config.max_iterations == 0 {
        return Err(WeftError::Configuration(format!(
            "agent '{agent}' has max_iterations = 0"
        )));
    }
    if !history.is_settled() {
        return Err(WeftError::protocol(format!(
            "agent '{agent}' has unresolved tool uses: {}",
            history.outstanding_tool_uses().join(", ")
        )));
    }

    let start_len = history.len();
    history.push(input)?;
    emitter.emit(AgentEvent::TurnStart {
        agent: agent.to_string(),
    });
    tracing::debug!(agent, "turn started");

    let executor = ToolExecutor::new(config.tools.clone())
        .with_concurrency(config.limits.tool_concurrency)
        .with_timeout(config.limits.tool_timeout);
    let mut metrics = TurnMetrics::default();
    let mut iterations = 0usize;

    let status = loop {
        if iterations >= config.max_iterations {
            tracing::debug!(agent, iterations, "iteration budget exhausted");
            emitter.emit(AgentEvent::IterationBudgetExhausted {
                agent: agent.to_string(),
                max_iterations: config.max_iterations,
            });
            break TurnStatus::IterationBudgetExhausted;
        }

        *state = LoopState::ModelQuery;
        emitter.emit(AgentEvent::ModelQuery {
            agent: agent.to_string(),
            iteration: iterations + 1,
            messages: history.len(),
        });
        let response =
            match llm_phase::query_model(config, history, emitter, cancel, &mut metrics).await {
                Ok(response) => response,
                Err(WeftError::Canceled) => break TurnStatus::Canceled,
                Err(err) => return Err(err),
            };
        iterations += 1;
        metrics.model_queries += 1;
        metrics.usage.merge(&response.usage);

        history
            .push(Message::new(Role::Assistant, response.content))
            .map_err(|err| WeftError::model_query_failed(agent, err))?;
        let calls: Vec<_> = history
            .last()
            .map(|m| m.tool_uses().into_iter().cloned().collect())
            .unwrap_or_default();
        if calls.is_empty() {
            break TurnStatus::Completed;
        }

        *state = LoopState::ToolDispatch;
        tracing::debug!(agent, iteration = iterations, calls = calls.len(), "dispatching tools");
        let results =
            tool_phase::dispatch(agent, &executor, &calls, emitter, cancel, &mut metrics).await;
        history.push(Message::tool_results(results))?;

        if cancel.is_cancelled() {
            break TurnStatus::Canceled;
        }
    };

    *state = LoopState::Finalized;
    let new_messages = history.messages()[start_len..].to_vec();
    let text = match status {
        TurnStatus::Completed => history.last().map(Message::text),
        _ => last_assistant_text(&new_messages),
    };
    metrics.duration_ms = started.elapsed().as_millis() as u64;

    emitter.emit(AgentEvent::TurnEnd {
        agent: agent.to_string(),
        status,
        iterations,
    });
    tracing::debug!(agent, %status, iterations, "turn finished");

    Ok(TurnResult {
        run_id: emitter.run_id(),
        status,
        text,
        new_messages,
        iterations,
        metrics,
    })
}

fn last_assistant_text(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant && m.has_text())
        .map(Message::text)
}
