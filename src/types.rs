//! Common types used throughout sinkflow
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Result Tables
// ============================================================================

/// A computed result table handed to the router.
///
/// Carries the Arrow schema and record batches produced by the processing
/// engine, plus the engine's human-readable query-plan text when it was
/// captured at computation time. The plan text is only used for best-effort
/// lineage extraction.
#[derive(Debug, Clone)]
pub struct ResultTable {
    /// Schema of the table (also valid when `batches` is empty)
    schema: SchemaRef,
    /// Record batches holding the rows
    batches: Vec<RecordBatch>,
    /// Engine plan text captured alongside the result, if any
    plan: Option<String>,
}

impl ResultTable {
    /// Create a result table from batches. The schema is taken from the
    /// first batch.
    pub fn new(batches: Vec<RecordBatch>) -> Option<Self> {
        let schema = batches.first()?.schema();
        Some(Self {
            schema,
            batches,
            plan: None,
        })
    }

    /// Create a result table with an explicit schema. Allows empty results.
    pub fn with_schema(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self {
            schema,
            batches,
            plan: None,
        }
    }

    /// Attach the engine's plan text
    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    /// Schema of the table
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Record batches
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Engine plan text, if captured
    pub fn plan(&self) -> Option<&str> {
        self.plan.as_deref()
    }

    /// Total number of rows across all batches
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }
}

/// Named result tables keyed by the name the sinks reference them under
pub type ResultSet = HashMap<String, ResultTable>;

// ============================================================================
// Write Mode
// ============================================================================

/// How data is written into an existing destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Append rows to the destination
    #[default]
    Append,
    /// Replace the destination contents
    Overwrite,
    /// Fail when the destination already exists
    ErrorIfExists,
}
