//! Command implementations for the Sextant CLI.
//!
//! Each handler deserializes its input, runs the pure engine functions, and
//! returns a result type implementing [`Output`] for JSON or human
//! rendering. No handler mutates the snapshot it was given.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::analysis::{self, AnalyzerConfig, DependencyHealthCheck};
use crate::models::graph::DependencyGraph;
use crate::models::{Role, Snapshot, WorkItem, WorkItemType};
use crate::phase::{self, Phase};
use crate::readiness::{self, ComputedInputs, FeedbackStats, ReadinessResult};
use crate::review::{self, ReviewAction, ReviewActionResult};
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// Read and deserialize JSON from a file, or stdin when no path is given.
fn read_json<T: DeserializeOwned>(input: Option<&Path>) -> Result<T> {
    let data = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&data)?)
}

/// Request body for the readiness command.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadinessRequest {
    pub work_item: WorkItem,

    /// Number of timeline sub-items attached to the work item
    #[serde(default)]
    pub timeline_items_count: usize,

    /// Feedback counters, when the caller tracks feedback
    #[serde(default)]
    pub feedback_stats: Option<FeedbackStats>,
}

/// Readiness result plus the review-gate consultation for the next phase.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    #[serde(flatten)]
    pub readiness: ReadinessResult,

    /// True when the candidate next phase is blocked by an unapproved review
    pub next_phase_blocked_by_review: bool,
}

impl Output for ReadinessReport {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let r = &self.readiness;
        let mut lines = Vec::new();
        lines.push(format!(
            "{} ({}): {}% ready in phase '{}'",
            r.item_id, r.item_type, r.readiness_percent, r.current_phase
        ));
        lines.push(format!(
            "  required {:.1}%, optional {:.1}%",
            r.required_percent, r.optional_percent
        ));
        match (r.is_terminal, r.next_phase) {
            (true, _) => lines.push("  phase is terminal".to_string()),
            (false, Some(next)) if r.can_upgrade && self.next_phase_blocked_by_review => {
                lines.push(format!("  ready for '{}' but blocked by review", next));
            }
            (false, Some(next)) if r.can_upgrade => {
                lines.push(format!("  ready to advance to '{}'", next));
            }
            (false, Some(next)) => lines.push(format!("  not yet ready for '{}'", next)),
            (false, None) => {}
        }
        for missing in &r.missing_required {
            lines.push(format!("  missing: {} - {}", missing.field, missing.hint));
        }
        for suggestion in &r.suggestions {
            lines.push(format!("  hint: {}", suggestion));
        }
        lines.join("\n")
    }
}

/// Score one work item's readiness and consult the review gate for its
/// candidate next phase.
pub fn readiness(input: Option<&Path>) -> Result<ReadinessReport> {
    let request: ReadinessRequest = read_json(input)?;
    let inputs = ComputedInputs {
        timeline_items_count: request.timeline_items_count,
        feedback_stats: request.feedback_stats,
    };
    let result = readiness::calculate_readiness(&request.work_item, &inputs)?;
    let next_phase_blocked_by_review =
        review::next_phase_blocked(&request.work_item, result.current_phase);
    Ok(ReadinessReport {
        readiness: result,
        next_phase_blocked_by_review,
    })
}

impl Output for DependencyHealthCheck {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Health score: {}/100", self.health_score));
        for cycle in &self.cycles {
            let mut line = format!("  cycle: {}", cycle.nodes.join(" -> "));
            if let Some(brk) = &cycle.suggested_break {
                line.push_str(&format!(
                    " (suggest removing {} -> {})",
                    brk.source, brk.target
                ));
            }
            lines.push(line);
        }
        if self.critical_path_skipped {
            lines.push("  critical path: skipped (ordering subgraph is cyclic)".to_string());
        } else if let Some(cp) = &self.critical_path {
            lines.push(format!(
                "  critical path: {} ({}h)",
                cp.path.join(" -> "),
                cp.total_duration_hours
            ));
            for alt in &cp.alternates {
                lines.push(format!("  alternate: {}", alt.join(" -> ")));
            }
        }
        for bottleneck in &self.bottlenecks {
            lines.push(format!(
                "  bottleneck: {} (in {}, out {}, risk {:.2})",
                bottleneck.id,
                bottleneck.dependency_count,
                bottleneck.dependent_count,
                bottleneck.risk
            ));
        }
        if !self.orphans.is_empty() {
            lines.push(format!("  orphans: {}", self.orphans.join(", ")));
        }
        for issue in &self.issues {
            lines.push(format!("  issue: {:?}", issue));
        }
        lines.join("\n")
    }
}

/// Analyze a full dependency snapshot.
pub fn analyze(input: Option<&Path>, config: &AnalyzerConfig) -> Result<DependencyHealthCheck> {
    let snapshot: Snapshot = read_json(input)?;
    let graph = DependencyGraph::from_snapshot(snapshot);
    Ok(analysis::analyze(&graph, config))
}

impl Output for ReviewActionResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let status = match self.new_status {
            Some(s) => s.to_string(),
            None => "unset".to_string(),
        };
        format!(
            "{}: {} for '{}' -> review status {}",
            self.item_id, self.action, self.target_phase, status
        )
    }
}

/// Apply a review-gate action against an item found in the snapshot.
pub fn review(
    input: Option<&Path>,
    item_id: &str,
    target_phase: &str,
    action: &str,
    role: &str,
) -> Result<ReviewActionResult> {
    let snapshot: Snapshot = read_json(input)?;
    let item = snapshot
        .nodes
        .iter()
        .find(|n| n.id == item_id)
        .ok_or_else(|| Error::NotFound(item_id.to_string()))?;
    let action: ReviewAction = action.parse().map_err(Error::InvalidInput)?;
    let role: Role = role.parse().map_err(Error::InvalidInput)?;
    let target = phase::resolve(item.item_type, target_phase)?;
    review::apply_action(item, target, action, role)
}

/// Result of a transition validation.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionReport {
    pub item_type: WorkItemType,
    pub from: Phase,
    pub to: Phase,
    pub valid: bool,
}

impl Output for TransitionReport {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("{}: '{}' -> '{}' is valid", self.item_type, self.from, self.to)
    }
}

/// Validate a phase transition; an invalid transition is an error naming
/// both phases.
pub fn transition(item_type: &str, from: &str, to: &str) -> Result<TransitionReport> {
    let item_type: WorkItemType = item_type.parse().map_err(Error::InvalidInput)?;
    let from = phase::resolve(item_type, from)?;
    let to = phase::resolve(item_type, to)?;
    phase::validate_transition(item_type, from, to)?;
    Ok(TransitionReport {
        item_type,
        from,
        to,
        valid: true,
    })
}
