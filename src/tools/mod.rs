//! Tool system: definitions, registry, validation and execution.

pub mod arguments;
pub mod executor;
pub mod registry;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use executor::ToolExecutor;
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolExecutionContext, ToolSpec};
pub use types::{ParameterBuilder, ToolInvocation, ToolSchema};
