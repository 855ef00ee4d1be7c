//! Tests for configuration loading and how it feeds agents and graphs.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use weft::prelude::*;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn file_values_override_defaults() {
    let file = write_config(
        r#"
max_iterations = 4
tool_timeout_ms = 1500
max_graph_hops = 9
retry_max_attempts = 5
"#,
    );

    let config = RuntimeConfig::from_file(file.path()).unwrap();

    assert_eq!(config.max_iterations, 4);
    assert_eq!(config.tool_timeout_ms, 1500);
    assert_eq!(config.max_graph_hops, 9);
    assert_eq!(config.retry_max_attempts, 5);
    assert_eq!(config.model_timeout_ms, RuntimeConfig::default().model_timeout_ms);
}

#[test]
fn malformed_file_is_a_parse_error() {
    let file = write_config("max_iterations = \"many\"");

    let err = RuntimeConfig::from_file(file.path()).unwrap_err();

    assert!(matches!(err, WeftError::TomlParse(_)));
    assert_eq!(err.kind(), "config_parse");
}

#[test]
fn missing_explicit_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = RuntimeConfig::load(Some(&path)).unwrap_err();

    assert!(matches!(err, WeftError::Io(_)));
}

#[test]
fn environment_wins_over_file() {
    let file = write_config("max_iterations = 4\ntool_concurrency = 2\n");
    let mut config = RuntimeConfig::from_file(file.path()).unwrap();
    let env: HashMap<&str, &str> = [("WEFT_MAX_ITERATIONS", "12"), ("WEFT_MODEL_TIMEOUT_MS", "900")]
        .into_iter()
        .collect();

    config
        .apply_env_with(|key| env.get(key).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.max_iterations, 12);
    assert_eq!(config.tool_concurrency, 2);
    assert_eq!(config.model_timeout_ms, 900);
}

#[test]
fn zero_hops_from_environment_is_rejected() {
    let mut config = RuntimeConfig::default();

    let err = config
        .apply_env_with(|key| (key == "WEFT_MAX_GRAPH_HOPS").then(|| "0".to_string()))
        .unwrap_err();

    assert!(matches!(err, WeftError::Configuration(_)));
}

#[test]
fn runtime_config_drives_agent_and_graph_limits() {
    let config = RuntimeConfig::from_toml_str(
        r#"
max_iterations = 2
tool_concurrency = 0
tool_timeout_ms = 250
model_timeout_ms = 750
max_graph_hops = 7
retry_max_attempts = 0
"#,
    )
    .unwrap();

    let provider = Arc::new(ScriptedProvider::new("script"));
    let agent = AgentConfig::from_runtime("cfg", provider, Arc::new(ToolRegistry::new()), &config);
    assert_eq!(agent.max_iterations, 2);
    assert_eq!(agent.limits.tool_concurrency, 1);
    assert_eq!(agent.limits.tool_timeout, Duration::from_millis(250));
    assert_eq!(agent.limits.model_timeout, Duration::from_millis(750));
    assert_eq!(agent.limits.retry.max_attempts, 1);

    let orchestrator = Orchestrator::from_config(AgentGraph::new(), &config);
    assert_eq!(orchestrator.max_hops(), 7);
}
