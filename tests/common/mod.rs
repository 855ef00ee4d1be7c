//! Shared test helpers.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use weft::prelude::*;

/// Registry with an `add(a, b)` tool.
pub fn add_tool() -> ToolSpec {
    ToolSpec::new(
        "add",
        "Add two numbers",
        ToolSchema::object()
            .number("a", "Left operand", true)
            .number("b", "Right operand", true)
            .build(),
        |args, _ctx| async move { Ok(serde_json::json!(args.get_f64("a")? + args.get_f64("b")?)) },
    )
}

pub fn registry(tools: Vec<ToolSpec>) -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool).expect("unique tool names");
    }
    Arc::new(registry)
}

pub fn config(
    name: &str,
    provider: Arc<ScriptedProvider>,
    tools: Arc<ToolRegistry>,
    max_iterations: usize,
) -> AgentConfig {
    AgentConfig::builder()
        .name(name)
        .provider(provider)
        .tools(tools)
        .max_iterations(max_iterations)
        .build()
}

/// Provider that always answers with the same text.
pub fn fixed(name: &str, text: &'static str) -> Arc<ScriptedProvider> {
    Arc::new(ScriptedProvider::from_fn(name, move |_| Ok(ModelResponse::text(text))))
}

/// Collects every emitted event.
pub fn event_collector() -> (EventSink, Arc<Mutex<Vec<EventEnvelope>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);
    let sink: EventSink = Arc::new(move |envelope: EventEnvelope| {
        sink_events.lock().unwrap().push(envelope);
    });
    (sink, events)
}

/// Text of the last user message in a request.
pub fn last_user_text(request: &ModelRequest) -> String {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(Message::text)
        .unwrap_or_default()
}
