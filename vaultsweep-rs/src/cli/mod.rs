//! CLI command implementations.

pub mod args;
pub mod output;

pub mod block_refs;
pub mod cards;
pub mod covers;
pub mod videos;

pub use args::{Cli, Commands};
pub use output::Output;
