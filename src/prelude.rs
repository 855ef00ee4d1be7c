//! Convenience re-exports for common use.

pub use crate::agent::{Agent, AgentConfig, ConversationManager, FullHistory, SlidingWindow};
pub use crate::agent_loop::{
    AgentEvent, EventEnvelope, EventSink, HookId, HookRegistry, LoopLimits, LoopState,
    TurnMetrics, TurnResult, TurnStatus,
};
pub use crate::config::RuntimeConfig;
pub use crate::error::{Result, WeftError};
pub use crate::graph::{
    AgentEdge, AgentGraph, AgentNode, EdgeCondition, GraphRunResult, GraphStatus, NodeOutput,
    NodeStatus, Orchestrator, Swarm,
};
pub use crate::provider::{ModelProvider, ModelRequest, ModelResponse, ScriptedProvider, ToolDefinition};
pub use crate::tools::{
    Tool, ToolArguments, ToolExecutionContext, ToolExecutor, ToolInvocation, ToolRegistry,
    ToolSchema, ToolSpec,
};
pub use crate::types::{ContentBlock, History, Message, Role, ToolResult, ToolUse, Usage};
pub use crate::util::retry::RetryPolicy;
pub use tokio_util::sync::CancellationToken;
