//! Lineage extraction module
//!
//! Best-effort recovery of source tables/files and write destinations by
//! pattern-matching the processing engine's human-readable plan text.
//!
//! The plan text is debug output of another system, not a stable format;
//! everything here is opportunistic. A report with no sources or no
//! destinations is a normal outcome.

mod parser;
mod types;

pub use parser::parse_plan;
pub use types::{LineageReport, SourceInfo};

#[cfg(test)]
mod tests;
