//! Tests for the tool system: schemas, registry and executor.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use weft::prelude::*;

use common::{add_tool, registry};

fn counting_tool(name: &str, counter: Arc<AtomicUsize>) -> ToolSpec {
    ToolSpec::new(
        name,
        "Counts invocations",
        ToolSchema::object().integer("n", "A number", true).build(),
        move |_args, _ctx| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(json!("counted"))
            }
        },
    )
}

fn sleeper(name: &str, delay: Duration) -> ToolSpec {
    ToolSpec::new(name, "Sleeps", ToolSchema::empty(), move |_args, _ctx| async move {
        tokio::time::sleep(delay).await;
        Ok(json!("woke"))
    })
}

#[test]
fn parameter_builder_constructs_schema() {
    let params = ToolSchema::object()
        .string("query", "Search query", true)
        .number("limit", "Max results", false)
        .string_enum("format", "Output format", &["json", "text"], false)
        .build();

    let schema = &params.schema;
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["query"]["type"], "string");
    assert_eq!(schema["properties"]["format"]["enum"], json!(["json", "text"]));
    assert_eq!(schema["required"], json!(["query"]));
}

#[test]
fn tool_arguments_typed_access() {
    let args = ToolArguments::new(json!({"name": "Alice", "age": 30, "active": true}));
    assert_eq!(args.get_str("name").unwrap(), "Alice");
    assert_eq!(args.get_i64("age").unwrap(), 30);
    assert!(args.get_bool("active").unwrap());
    assert!(args.get_str("missing").is_err());
    assert_eq!(args.get_str_opt("missing"), None);
}

#[tokio::test]
async fn schema_violation_never_invokes_handler() {
    let counter = Arc::new(AtomicUsize::new(0));
    let executor = ToolExecutor::new(registry(vec![counting_tool("count", counter.clone())]));

    let result = executor
        .execute(
            &ToolInvocation::new("c1", "count", json!({"n": "seven"})),
            &CancellationToken::new(),
        )
        .await;

    assert!(result.is_error);
    assert_eq!(result.tool_use_id, "c1");
    assert_eq!(result.result["kind"], "schema_violation");
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn batch_isolates_failures_and_keeps_order() {
    let executor = ToolExecutor::new(registry(vec![add_tool()]));
    let invocations = vec![
        ToolInvocation::new("c1", "add", json!({"a": 1, "b": 2})),
        ToolInvocation::new("c2", "missing_tool", json!({})),
        ToolInvocation::new("c3", "add", json!({"a": "x", "b": 2})),
        ToolInvocation::new("c4", "add", json!({"a": 10, "b": 5})),
    ];

    let results = executor
        .execute_batch(&invocations, &CancellationToken::new())
        .await;

    let ids: Vec<_> = results.iter().map(|r| r.tool_use_id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3", "c4"]);
    assert_eq!(results[0].result, json!(3.0));
    assert_eq!(results[1].result["kind"], "tool_not_found");
    assert_eq!(results[2].result["kind"], "schema_violation");
    assert_eq!(results[3].result, json!(15.0));
}

#[tokio::test(start_paused = true)]
async fn batch_respects_concurrency_bound() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (active_c, peak_c) = (active.clone(), peak.clone());
    let tool = ToolSpec::new("work", "Busy work", ToolSchema::empty(), move |_args, _ctx| {
        let (active, peak) = (active_c.clone(), peak_c.clone());
        async move {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            active.fetch_sub(1, Ordering::SeqCst);
            Ok(json!("done"))
        }
    });
    let executor = ToolExecutor::new(registry(vec![tool])).with_concurrency(2);
    let invocations: Vec<_> = (0..6)
        .map(|i| ToolInvocation::new(format!("c{i}"), "work", json!({})))
        .collect();

    let results = executor
        .execute_batch(&invocations, &CancellationToken::new())
        .await;

    assert_eq!(results.len(), 6);
    assert!(results.iter().all(|r| !r.is_error));
    assert_eq!(peak.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn batch_results_follow_request_order_not_completion_order() {
    let executor = ToolExecutor::new(registry(vec![
        sleeper("slow", Duration::from_millis(300)),
        sleeper("fast", Duration::from_millis(10)),
    ]));
    let invocations = vec![
        ToolInvocation::new("first", "slow", json!({})),
        ToolInvocation::new("second", "fast", json!({})),
    ];

    let results = executor
        .execute_batch(&invocations, &CancellationToken::new())
        .await;

    assert_eq!(results[0].tool_use_id, "first");
    assert_eq!(results[1].tool_use_id, "second");
}

#[tokio::test(start_paused = true)]
async fn timeout_synthesises_error_result() {
    let executor = ToolExecutor::new(registry(vec![sleeper("slow", Duration::from_secs(60))]))
        .with_timeout(Duration::from_millis(100));

    let result = executor
        .execute(
            &ToolInvocation::new("c1", "slow", json!({})),
            &CancellationToken::new(),
        )
        .await;

    assert!(result.is_error);
    assert_eq!(result.result["kind"], "timeout");
    assert_eq!(result.tool_use_id, "c1");
}

#[tokio::test(start_paused = true)]
async fn cancellation_discards_running_handler() {
    let executor = ToolExecutor::new(registry(vec![sleeper("slow", Duration::from_secs(60))]));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = executor
        .execute(&ToolInvocation::new("c1", "slow", json!({})), &cancel)
        .await;

    assert!(result.is_error);
    assert_eq!(result.result["kind"], "canceled");
}

#[tokio::test]
async fn handler_sees_call_id_and_tool_name() {
    let echo = ToolSpec::new("whoami", "Echoes its context", ToolSchema::empty(), |_args, ctx| async move {
        Ok(json!({"call_id": ctx.call_id, "tool": ctx.tool_name}))
    });
    let executor = ToolExecutor::new(registry(vec![echo]));

    let result = executor
        .execute(
            &ToolInvocation::new("c7", "whoami", json!({})),
            &CancellationToken::new(),
        )
        .await;

    assert!(!result.is_error);
    assert_eq!(result.result, json!({"call_id": "c7", "tool": "whoami"}));
}

#[tokio::test]
async fn handler_error_becomes_error_payload() {
    let failing = ToolSpec::new("fail", "Fails", ToolSchema::empty(), |_args, _ctx| async move {
        Err::<serde_json::Value, _>(WeftError::tool("fail", "disk full"))
    });
    let executor = ToolExecutor::new(registry(vec![failing]));

    let result = executor
        .execute(
            &ToolInvocation::new("c1", "fail", json!({})),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(
        result.error_message(),
        Some("Tool execution error: fail: disk full")
    );
    assert_eq!(result.result["kind"], "tool_execution");
}

#[test]
fn registry_definitions_expose_schema() {
    let registry = registry(vec![add_tool()]);
    let defs = registry.definitions();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "add");
    assert_eq!(defs[0].parameters["required"], json!(["a", "b"]));
}
