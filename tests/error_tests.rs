//! Tests for the error system.

use weft::error::unified::*;
use weft::error::*;

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: WeftError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
        expected_recovery: RecoverySuggestion,
    }

    let io_error = std::io::Error::other("disk");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: WeftError::RateLimited {
                retry_after_ms: Some(1000),
            },
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: WeftError::ProviderUnavailable("503".to_string()),
            expected_category: ErrorCategory::Provider,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: WeftError::InvalidResponse("garbled".to_string()),
            expected_category: ErrorCategory::Provider,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::Abort,
        },
        Case {
            error: WeftError::Timeout(5000),
            expected_category: ErrorCategory::Timeout,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::IncreaseTimeout,
        },
        Case {
            error: WeftError::Configuration("bad-config".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckConfiguration,
        },
        Case {
            error: WeftError::schema_violation("add", "a", "missing required field"),
            expected_category: ErrorCategory::Validation,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CorrectArguments,
        },
        Case {
            error: WeftError::tool("tool-a", "failed"),
            expected_category: ErrorCategory::ToolExecution,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckToolImplementation,
        },
        Case {
            error: WeftError::GraphHopLimitExceeded { limit: 3 },
            expected_category: ErrorCategory::Budget,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::RaiseLimit,
        },
        Case {
            error: WeftError::Canceled,
            expected_category: ErrorCategory::Canceled,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::Abort,
        },
        Case {
            error: WeftError::Io(io_error),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::Abort,
        },
        Case {
            error: WeftError::Serialization(serde_error),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::Abort,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category, "{}", case.error);
        assert_eq!(case.error.is_retryable(), case.expected_retryable, "{}", case.error);
        assert_eq!(
            case.error.recovery_suggestion(),
            case.expected_recovery,
            "{}",
            case.error
        );
    }
}

#[test]
fn retry_after_is_only_reported_for_rate_limits() {
    let limited = WeftError::RateLimited {
        retry_after_ms: Some(1500),
    };
    assert_eq!(limited.retry_after_ms(), Some(1500));
    assert_eq!(WeftError::ProviderUnavailable("x".into()).retry_after_ms(), None);
}

#[test]
fn kinds_are_snake_case_identifiers() {
    assert_eq!(WeftError::ToolNotFound("x".into()).kind(), "tool_not_found");
    assert_eq!(WeftError::Timeout(1).kind(), "timeout");
    assert_eq!(WeftError::Canceled.kind(), "canceled");
    assert_eq!(
        WeftError::DanglingEdgeReference {
            source_id: "a".into(),
            target_id: "b".into(),
            missing: "b".into(),
        }
        .kind(),
        "dangling_edge_reference"
    );
}

#[test]
fn display_messages_name_the_offender() {
    assert_eq!(
        WeftError::ToolNotFound("search".into()).to_string(),
        "Tool not found: search"
    );
    assert_eq!(
        WeftError::DanglingEdgeReference {
            source_id: "A".into(),
            target_id: "Z".into(),
            missing: "Z".into(),
        }
        .to_string(),
        "Edge A -> Z references unknown node 'Z'"
    );
    assert_eq!(
        WeftError::model_query_failed("planner", WeftError::Timeout(500)).to_string(),
        "Model query failed for agent 'planner': Timeout after 500ms"
    );
}

#[test]
fn category_serializes_snake_case() {
    let json = serde_json::to_string(&ErrorCategory::ToolExecution).unwrap();
    assert_eq!(json, "\"tool_execution\"");
}
