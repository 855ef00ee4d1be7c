//! Tool trait and closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::arguments::ToolArguments;
use super::types::ToolSchema;
use crate::error::WeftError;

/// Context available during tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolExecutionContext {
    /// Id of the `ToolUse` block being answered.
    pub call_id: String,
    /// Name the model used to call the tool.
    pub tool_name: String,
    /// Fires when the invocation is canceled or times out.
    pub cancel: CancellationToken,
}

/// Core tool trait. Implement it for tools with their own state.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, as the model calls it.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema for the tool input.
    fn parameters(&self) -> &ToolSchema;

    /// Execute with arguments that already passed schema validation.
    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, WeftError>;
}

type ToolHandler = dyn Fn(
        ToolArguments,
        ToolExecutionContext,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, WeftError>> + Send>>
    + Send
    + Sync;

/// Closure-backed tool: name, description, input schema and handler.
pub struct ToolSpec {
    name: String,
    description: String,
    parameters: ToolSchema,
    handler: Arc<ToolHandler>,
}

impl ToolSpec {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolSchema,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<serde_json::Value, WeftError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
        }
    }
}

#[async_trait]
impl Tool for ToolSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ToolSchema {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, WeftError> {
        (self.handler)(args.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
