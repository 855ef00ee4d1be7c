//! Core conversation types.

pub mod history;
pub mod message;
pub mod usage;

pub use history::*;
pub use message::*;
pub use usage::*;
