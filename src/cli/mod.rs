//! CLI module
//!
//! Command-line interface for running collections.
//!
//! # Commands
//!
//! - `collect` - Collect one point type for one scope
//! - `collect-batch` - Collect a JSON list of requests concurrently
//! - `cache show` / `cache clear` - Inspect or reset the completion cache

mod commands;
mod runner;

pub use commands::{CacheAction, Cli, Commands};
pub use runner::Runner;

#[cfg(test)]
mod tests;
