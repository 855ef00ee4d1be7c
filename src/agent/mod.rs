//! Agents: configuration, conversation windowing and the turn API.

pub mod agent;
pub mod config;
pub mod conversation;

pub use agent::Agent;
pub use config::AgentConfig;
pub use conversation::{ConversationManager, FullHistory, SlidingWindow};
