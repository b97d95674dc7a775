//! CLI command handlers.

pub mod compose;
pub mod context;
pub mod cost;
mod display;
pub mod search;
pub mod share;
pub mod slots;

pub use context::CommandContext;
