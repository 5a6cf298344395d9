//! Lineage report types

use serde::{Deserialize, Serialize};

/// A data source recovered from plan text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source_type", rename_all = "snake_case")]
pub enum SourceInfo {
    /// A relational scan pushed down to an external database
    Relation {
        /// Full pushed-down query text
        query: String,
        /// Database (schema) the query reads from
        database: String,
        /// Table the query reads from
        table: String,
        /// Alias the engine assigned to the relation
        alias: String,
    },

    /// A file scan over an object-store or filesystem location
    FileScan {
        /// File format reported by the engine (parquet, orc, ...)
        format: String,
        /// Location string as printed by the engine
        location: String,
    },
}

/// Result of scraping one plan text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageReport {
    /// Sources read by the query, first-seen order, deduplicated
    pub sources: Vec<SourceInfo>,

    /// Write destinations found in the physical plan
    pub write_destinations: Vec<String>,
}

impl LineageReport {
    /// True when neither sources nor destinations were recovered
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.write_destinations.is_empty()
    }

    /// True when at least one source was recovered
    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}
