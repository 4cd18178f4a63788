//! Integration tests for the analyze command via CLI.
//!
//! These verify whole-graph analysis over a JSON snapshot:
//! - cycle detection and the suggested break
//! - critical path totals and the skip-under-cycles flag
//! - health score penalties and input validation issues

mod common;

use common::{chain_snapshot, cycle_snapshot, sx};
use predicates::prelude::*;

#[test]
fn test_analyze_reports_cycle_and_skips_critical_path() {
    sx().arg("analyze")
        .write_stdin(cycle_snapshot())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"critical_path_skipped\":true"))
        .stdout(predicate::str::contains("\"cycles\":[{"))
        .stdout(predicate::str::contains("\"suggested_break\""));
}

#[test]
fn test_analyze_critical_path_chain() {
    sx().arg("analyze")
        .write_stdin(chain_snapshot())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_duration_hours\":6.0"))
        .stdout(predicate::str::contains("\"path\":[\"a\",\"b\",\"c\"]"))
        .stdout(predicate::str::contains("\"critical_path_skipped\":false"))
        .stdout(predicate::str::contains("\"health_score\":100"));
}

#[test]
fn test_analyze_collects_issues_without_aborting() {
    let snapshot = r#"{
        "nodes": [
            {"id": "a", "type": "feature", "title": "A", "phase": "design"},
            {"id": "b", "type": "feature", "title": "B", "phase": "design"}
        ],
        "edges": [
            {"id": "cx-1", "source": "a", "target": "b", "kind": "dependency"},
            {"id": "cx-2", "source": "a", "target": "a", "kind": "dependency"},
            {"id": "cx-3", "source": "b", "target": "ghost", "kind": "blocks"}
        ]
    }"#;

    sx().arg("analyze")
        .write_stdin(snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\":\"self_loop\""))
        .stdout(predicate::str::contains("\"kind\":\"dangling_edge\""))
        .stdout(predicate::str::contains("\"path\":[\"a\",\"b\"]"));
}

#[test]
fn test_analyze_orphans_lower_health() {
    let snapshot = r#"{
        "nodes": [
            {"id": "a", "type": "feature", "title": "A", "phase": "design"},
            {"id": "b", "type": "feature", "title": "B", "phase": "design"},
            {"id": "lonely", "type": "bug", "title": "L", "phase": "triage"}
        ],
        "edges": [
            {"id": "cx-1", "source": "a", "target": "b", "kind": "dependency"}
        ]
    }"#;

    sx().arg("analyze")
        .write_stdin(snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"orphans\":[\"lonely\"]"))
        .stdout(predicate::str::contains("\"health_score\":95"));
}

#[test]
fn test_analyze_human_output() {
    sx().args(["analyze", "--human"])
        .write_stdin(chain_snapshot())
        .assert()
        .success()
        .stdout(predicate::str::contains("Health score: 100/100"))
        .stdout(predicate::str::contains("critical path: a -> b -> c (6h)"));
}

#[test]
fn test_analyze_default_duration_flag() {
    let snapshot = r#"{
        "nodes": [
            {"id": "a", "type": "feature", "title": "A", "phase": "design"},
            {"id": "b", "type": "feature", "title": "B", "phase": "design"}
        ],
        "edges": [
            {"id": "cx-1", "source": "a", "target": "b", "kind": "dependency"}
        ]
    }"#;

    sx().args(["analyze", "--default-duration", "3"])
        .write_stdin(snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_duration_hours\":6.0"));
}

#[test]
fn test_analyze_malformed_json_fails() {
    sx().arg("analyze")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
