//! Plan-text scraping
//!
//! The patterns below chase the engine's plan printer output. They break
//! whenever the printer changes; callers must treat an empty report as a
//! normal outcome, not a failure.

use super::types::{LineageReport, SourceInfo};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Relational scans pushed down to an external database, e.g.
/// `JDBCRelation((select * from sales.orders) AS ord)`
static RELATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?si)JDBCRelation\(\((select\s+\*\s+from\s+([a-zA-Z0-9_]+)\.([a-zA-Z0-9_]+))\)\s+(.*?)\)",
    )
    .unwrap()
});

/// File scans, e.g.
/// `FileScan parquet [user_id#12] Location: InMemoryFileIndex[s3://lake/users]`
static FILE_SCAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)FileScan\s+(\w+)\s+\[.*?\]\s+Location: (.*?)]").unwrap());

/// Write destinations in the physical plan, e.g. `Write path: s3://lake/out`
static WRITE_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Write path: ([a-z0-9]+://\S+)").unwrap());

/// Scrape a plan text for sources and write destinations.
///
/// Duplicate sources are dropped; first-seen order is preserved.
pub fn parse_plan(plan: &str) -> LineageReport {
    let mut sources = Vec::new();
    let mut seen = HashSet::new();

    for cap in RELATION_REGEX.captures_iter(plan) {
        let source = SourceInfo::Relation {
            query: cap[1].to_string(),
            database: cap[2].to_string(),
            table: cap[3].to_string(),
            alias: cap[4].trim().to_string(),
        };
        if seen.insert(source.clone()) {
            sources.push(source);
        }
    }

    for cap in FILE_SCAN_REGEX.captures_iter(plan) {
        let source = SourceInfo::FileScan {
            format: cap[1].to_string(),
            location: cap[2].trim().to_string(),
        };
        if seen.insert(source.clone()) {
            sources.push(source);
        }
    }

    let write_destinations = WRITE_PATH_REGEX
        .captures_iter(plan)
        .map(|cap| cap[1].to_string())
        .collect();

    LineageReport {
        sources,
        write_destinations,
    }
}
