//! Tests for lineage extraction

use super::*;
use pretty_assertions::assert_eq;

const RELATION_PLAN: &str = r"
== Parsed Logical Plan ==
Project [order_id#0, amount#1]
+- Relation [order_id#0,amount#1] JDBCRelation((select * from sales.orders) AS ord) [numPartitions=1]

== Physical Plan ==
*(1) Scan JDBCRelation((select * from sales.orders) AS ord) [numPartitions=1] [order_id#0,amount#1]
";

const FILE_PLAN: &str = r"
== Physical Plan ==
*(1) ColumnarToRow
+- FileScan parquet [user_id#12,email#13] Location: InMemoryFileIndex[s3://lake/users], PartitionFilters: []
";

#[test]
fn test_relation_scan_extracted() {
    let report = parse_plan(RELATION_PLAN);

    assert_eq!(report.sources.len(), 1);
    match &report.sources[0] {
        SourceInfo::Relation {
            query,
            database,
            table,
            alias,
        } => {
            assert_eq!(query, "select * from sales.orders");
            assert_eq!(database, "sales");
            assert_eq!(table, "orders");
            assert_eq!(alias, "AS ord");
        }
        other => panic!("Expected relation source, got {other:?}"),
    }
}

#[test]
fn test_relation_scan_deduplicated_across_plan_sections() {
    // The same relation appears in both the logical and physical plan;
    // the report must list it once.
    let report = parse_plan(RELATION_PLAN);
    assert_eq!(report.sources.len(), 1);
}

#[test]
fn test_file_scan_extracted() {
    let report = parse_plan(FILE_PLAN);

    assert_eq!(report.sources.len(), 1);
    match &report.sources[0] {
        SourceInfo::FileScan { format, location } => {
            assert_eq!(format, "parquet");
            // The scrape keeps whatever the plan printer put after
            // "Location: ", including the index wrapper.
            assert_eq!(location, "InMemoryFileIndex[s3://lake/users");
        }
        other => panic!("Expected file scan source, got {other:?}"),
    }
}

#[test]
fn test_write_destinations_extracted() {
    let plan = r"
== Physical Plan ==
Execute InsertIntoHadoopFsRelationCommand Write path: s3://lake/exports/orders Append
";
    let report = parse_plan(plan);
    assert_eq!(report.write_destinations, vec!["s3://lake/exports/orders"]);
}

#[test]
fn test_write_destinations_cover_other_schemes() {
    let plan = "Write path: gs://lake/exports/orders stats: none";
    let report = parse_plan(plan);
    assert_eq!(report.write_destinations, vec!["gs://lake/exports/orders"]);
}

#[test]
fn test_empty_plan_gives_empty_report() {
    let report = parse_plan("== Physical Plan ==\n*(1) Project [a#0]\n");
    assert!(report.is_empty());
    assert!(!report.has_sources());
    assert!(report.write_destinations.is_empty());
}

#[test]
fn test_mixed_plan() {
    let plan = format!("{RELATION_PLAN}\n{FILE_PLAN}\nWrite path: s3://lake/out\n");
    let report = parse_plan(&plan);

    assert_eq!(report.sources.len(), 2);
    assert!(matches!(report.sources[0], SourceInfo::Relation { .. }));
    assert!(matches!(report.sources[1], SourceInfo::FileScan { .. }));
    assert_eq!(report.write_destinations, vec!["s3://lake/out"]);
}

#[test]
fn test_report_serializes_with_source_type_tag() {
    let report = parse_plan(RELATION_PLAN);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["sources"][0]["source_type"], "relation");
    assert_eq!(json["sources"][0]["table"], "orders");
}
