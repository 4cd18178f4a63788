//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;

/// Get a Command for the sx binary.
pub fn sx() -> Command {
    Command::cargo_bin("sx").expect("sx binary should build")
}

/// A three-node snapshot with a dependency cycle a -> b -> c -> a.
pub fn cycle_snapshot() -> String {
    r#"{
        "nodes": [
            {"id": "a", "type": "feature", "title": "A", "phase": "design"},
            {"id": "b", "type": "feature", "title": "B", "phase": "design"},
            {"id": "c", "type": "feature", "title": "C", "phase": "design"}
        ],
        "edges": [
            {"id": "cx-1", "source": "a", "target": "b", "kind": "dependency"},
            {"id": "cx-2", "source": "b", "target": "c", "kind": "dependency"},
            {"id": "cx-3", "source": "c", "target": "a", "kind": "dependency"}
        ]
    }"#
    .to_string()
}

/// A linear chain a(2h) -> b(3h) -> c(1h).
pub fn chain_snapshot() -> String {
    r#"{
        "nodes": [
            {"id": "a", "type": "feature", "title": "A", "phase": "design", "estimated_hours": 2.0},
            {"id": "b", "type": "feature", "title": "B", "phase": "design", "estimated_hours": 3.0},
            {"id": "c", "type": "feature", "title": "C", "phase": "design", "estimated_hours": 1.0}
        ],
        "edges": [
            {"id": "cx-1", "source": "a", "target": "b", "kind": "dependency"},
            {"id": "cx-2", "source": "b", "target": "c", "kind": "dependency"}
        ]
    }"#
    .to_string()
}

/// A snapshot holding one review-enabled feature in refine.
pub fn review_snapshot(review_status: Option<&str>) -> String {
    let status_field = match review_status {
        Some(s) => format!(r#", "review_status": "{}""#, s),
        None => String::new(),
    };
    format!(
        r#"{{
            "nodes": [
                {{"id": "wi-1", "type": "feature", "title": "Dark mode",
                  "phase": "refine", "review_enabled": true{}}}
            ],
            "edges": []
        }}"#,
        status_field
    )
}
