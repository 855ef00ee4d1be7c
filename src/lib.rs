//! Weft: an agent runtime.
//!
//! Agents hold a conversation history, query a pluggable [`ModelProvider`],
//! and run tools the model asks for before answering. Several agents can be
//! wired into a workflow graph whose edges route one agent's output to the
//! next.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use weft::prelude::*;
//!
//! # async fn example() -> weft::error::Result<()> {
//! let mut tools = ToolRegistry::new();
//! tools.register(ToolSpec::new(
//!     "add",
//!     "Add two numbers",
//!     ToolSchema::object()
//!         .number("a", "Left operand", true)
//!         .number("b", "Right operand", true)
//!         .build(),
//!     |args, _ctx| async move { Ok(serde_json::json!(args.get_f64("a")? + args.get_f64("b")?)) },
//! ))?;
//!
//! let provider = Arc::new(ScriptedProvider::new("script"));
//! provider
//!     .push_tool_call("call-1", "add", serde_json::json!({"a": 2, "b": 3}))
//!     .push_text("5");
//!
//! let config = AgentConfig::builder()
//!     .name("calculator")
//!     .provider(provider)
//!     .tools(Arc::new(tools))
//!     .build();
//! let mut agent = Agent::new(config);
//! let answer = agent.prompt("What is 2 + 3?").await?;
//! assert_eq!(answer, "5");
//! # Ok(())
//! # }
//! ```
//!
//! [`ModelProvider`]: provider::ModelProvider

pub mod agent;
pub mod agent_loop;
pub mod config;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;
