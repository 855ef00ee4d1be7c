//! Agent loop primitives (turns, events, limits).

pub mod events;
pub mod hooks;
pub mod limits;
pub(crate) mod runner;
pub mod types;

pub use events::*;
pub use hooks::{Hook, HookId, HookRegistry};
pub use limits::LoopLimits;
pub use types::*;
