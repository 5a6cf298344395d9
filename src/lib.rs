// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # sinkflow
//!
//! A thin routing layer that dispatches computed result tables to their
//! configured destinations: relational databases, file/object stores, and a
//! managed feature repository.
//!
//! ## Features
//!
//! - **Sink routing**: one YAML file declares the destinations; each result
//!   table is dispatched to the writer its sink type implies
//! - **Lineage extraction**: best-effort scraping of the engine's plan text
//!   for source tables and write destinations
//! - **Platform awareness**: local/test runs resolve everything from config;
//!   managed workspace jobs pull credentials from the secret vault and job
//!   identity from the platform context document
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sinkflow::{OutputRouter, ResultSet, ResultTable, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() -> sinkflow::Result<()> {
//!     let config = RouterConfig::load("sinks.yaml")?;
//!
//!     let mut results = ResultSet::new();
//!     results.insert(
//!         "orders".to_string(),
//!         ResultTable::new(batches).unwrap().with_plan(plan_text),
//!     );
//!
//!     let router = OutputRouter::new(config)?;
//!     let reports = router.write_to_sinks(&results).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        OutputRouter                         │
//! │   write_to_sinks(results) → Vec<SinkReport>                 │
//! └─────────────────────────────┬───────────────────────────────┘
//!                               │
//! ┌───────────┬─────────────────┼──────────────┬────────────────┐
//! │  Lineage  │   Credentials   │    Sinks     │    Context     │
//! ├───────────┼─────────────────┼──────────────┼────────────────┤
//! │ Relation  │ Local config    │ Relational   │ Local          │
//! │ FileScan  │ Secret vault    │ File store   │ Workspace job  │
//! │ WritePath │                 │ FeatureStore │   (+fallback)  │
//! └───────────┴─────────────────┴──────────────┴────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Sink configuration loaded from YAML
pub mod config;

/// Template interpolation for connection strings
pub mod template;

/// Platform context resolution
pub mod context;

/// Secret vault access
pub mod secrets;

/// Database credential resolution
pub mod credentials;

/// Lineage extraction from plan text
pub mod lineage;

/// Sink writers
pub mod sink;

/// Output routing
pub mod router;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{Platform, RouterConfig, SinkConfig};
pub use context::JobContext;
pub use lineage::{parse_plan, LineageReport};
pub use router::{OutputRouter, SinkOutcome, SinkReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
