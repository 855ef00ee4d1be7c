use tokio_util::sync::CancellationToken;

use super::super::events::{AgentEvent, EventEmitter};
use super::super::types::TurnMetrics;
use crate::tools::{ToolExecutor, ToolInvocation};
use crate::types::{ToolResult, ToolUse};

/// Run every requested tool and collect results in request order.
pub(super) async fn dispatch(
    agent: &str,
    executor: &ToolExecutor,
    calls: &[ToolUse],
    emitter: &EventEmitter,
    cancel: &CancellationToken,
    metrics: &mut TurnMetrics,
) -> Vec<ToolResult> {
    let invocations: Vec<ToolInvocation> = calls.iter().map(ToolInvocation::from).collect();
    for invocation in &invocations {
        emitter.emit(AgentEvent::ToolDispatched {
            agent: agent.to_string(),
            call_id: invocation.call_id.clone(),
            tool_name: invocation.tool_name.clone(),
            arguments: invocation.arguments.clone(),
        });
    }

    let results = executor.execute_batch(&invocations, cancel).await;

    metrics.tool_calls += results.len();
    for result in &results {
        if result.is_error {
            metrics.tool_errors += 1;
        }
        emitter.emit(AgentEvent::ToolResult {
            agent: agent.to_string(),
            result: result.clone(),
        });
    }
    results
}
