//! Immutable agent configuration.

use std::sync::Arc;

use bon::Builder;

use super::conversation::{ConversationManager, FullHistory};
use crate::agent_loop::limits::{LoopLimits, DEFAULT_MAX_ITERATIONS};
use crate::config::RuntimeConfig;
use crate::provider::ModelProvider;
use crate::tools::ToolRegistry;

/// Everything an agent needs to run turns. Shared read-only across forks.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use weft::prelude::*;
/// let config = AgentConfig::builder()
///     .name("calculator")
///     .system_prompt("Use the add tool for arithmetic.")
///     .provider(Arc::new(ScriptedProvider::new("script")))
///     .max_iterations(4)
///     .build();
/// ```
#[derive(Builder)]
pub struct AgentConfig {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub system_prompt: Option<String>,
    #[builder(default = Arc::new(ToolRegistry::new()))]
    pub tools: Arc<ToolRegistry>,
    /// Upper bound on model queries per turn.
    #[builder(default = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,
    pub provider: Arc<dyn ModelProvider>,
    #[builder(default)]
    pub limits: LoopLimits,
    #[builder(default = Arc::new(FullHistory))]
    pub conversation: Arc<dyn ConversationManager>,
}

impl AgentConfig {
    /// Config whose limits come from a [`RuntimeConfig`].
    pub fn from_runtime(
        name: impl Into<String>,
        provider: Arc<dyn ModelProvider>,
        tools: Arc<ToolRegistry>,
        runtime: &RuntimeConfig,
    ) -> Self {
        Self::builder()
            .name(name)
            .provider(provider)
            .tools(tools)
            .max_iterations(runtime.max_iterations)
            .limits(LoopLimits::from_config(runtime))
            .build()
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("name", &self.name)
            .field("system_prompt", &self.system_prompt)
            .field("tools", &self.tools)
            .field("max_iterations", &self.max_iterations)
            .field("provider", &self.provider.name())
            .field("limits", &self.limits)
            .field("conversation", &self.conversation)
            .finish()
    }
}
