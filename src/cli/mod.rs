//! CLI module
//!
//! Command-line interface for routing result tables.
//!
//! # Commands
//!
//! - `route` - Route result tables to the configured sinks
//! - `lineage` - Parse a plan text file and print the lineage report
//! - `validate` - Validate a routing configuration
//! - `context` - Print the resolved job context

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
