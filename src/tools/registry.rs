//! Name-indexed tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use super::tool::Tool;
use super::types::ToolInvocation;
use super::validation::validate_arguments;
use crate::error::{Result, WeftError};
use crate::provider::ToolDefinition;

/// Tools available to an agent, keyed by unique name.
///
/// Built once, then shared read-only behind an `Arc`.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<()> {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(WeftError::DuplicateToolName(name));
        }
        tracing::debug!(tool = %name, "registered tool");
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Builder-style registration.
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Resolve the tool and check arguments against its schema.
    pub fn validate(&self, invocation: &ToolInvocation) -> Result<Arc<dyn Tool>> {
        let tool = self
            .tools
            .get(&invocation.tool_name)
            .ok_or_else(|| WeftError::ToolNotFound(invocation.tool_name.clone()))?;
        validate_arguments(
            &invocation.tool_name,
            &invocation.arguments,
            &tool.parameters().schema,
        )?;
        Ok(Arc::clone(tool))
    }

    /// Definitions advertised to the model, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters().schema.clone(),
            })
            .collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}
