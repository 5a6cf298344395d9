//! Sink writers
//!
//! One writer per destination type:
//! - `FileSinkWriter` encodes batches and writes them to an object-store
//!   location (S3, GCS, Azure, or local filesystem)
//! - `RelationalWriter` loads batches into a relational database through an
//!   embedded DuckDB connection that attaches the target
//! - `FeatureStoreWriter` registers and writes feature tables over HTTP

mod feature_store;
mod file;
mod relational;

pub use feature_store::FeatureStoreWriter;
pub use file::{build_partitioned_path, FileDestination, FileSinkWriter};
pub use relational::RelationalWriter;
