//! Readiness scoring for a work item against its current-phase requirements.
//!
//! Each non-terminal `(type, phase)` pair has a static table of weighted
//! field checks, split into required and optional pools. The two pools are
//! scored independently and blended 70/30; upgrade eligibility additionally
//! demands every required field be complete. Computed facts the engine
//! cannot derive from the item itself (timeline item counts, feedback
//! state) are injected by the caller as [`ComputedInputs`] - the calculator
//! never reaches into external systems.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::models::{FieldValue, WorkItem, WorkItemType};
use crate::phase::{self, Phase};
use crate::Result;

/// Blend weight for the required-field pool.
pub const REQUIRED_BLEND: f64 = 0.7;

/// Blend weight for the optional-field pool.
pub const OPTIONAL_BLEND: f64 = 0.3;

/// Minimum blended score for upgrade eligibility. Required fields must also
/// all be complete; this bar exists so weak optional coverage still holds an
/// item back.
pub const UPGRADE_THRESHOLD: u8 = 80;

/// Timeline items needed for `has_scope` to hold via sub-item count.
pub const MIN_TIMELINE_ITEMS: usize = 1;

/// Predicate deciding whether a configured field counts as filled.
#[derive(Debug, Clone, Copy)]
pub enum FieldCheck {
    /// Text field with at least this many non-whitespace-trimmed characters
    Text { min_len: usize },
    /// Numeric field at or above a threshold (no partial credit below it)
    NumberAtLeast(f64),
    /// Boolean field that must be true
    BoolTrue,
    /// Date field that must be present
    DatePresent,
    /// `progress_percent` at or above a threshold
    ProgressAtLeast(f64),
    /// Scope exists: enough timeline items, or a non-empty `scope` text field
    HasScope,
    /// No pending critical feedback remains
    FeedbackAddressed,
}

/// One required-or-optional field contributing to the readiness score for a
/// `(type, phase)` pair. A weight of 0 is legal and documents a field
/// without scoring it.
#[derive(Debug, Clone, Copy)]
pub struct PhaseFieldConfig {
    pub field: &'static str,
    pub weight: u32,
    pub required: bool,
    pub check: FieldCheck,
    pub hint: &'static str,
}

/// Feedback counters supplied by the caller.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeedbackStats {
    /// Critical feedback records still awaiting resolution
    #[serde(default)]
    pub pending_critical: u32,
}

/// Caller-injected computed facts for one work item.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ComputedInputs {
    /// Number of timeline sub-items attached to the work item
    #[serde(default)]
    pub timeline_items_count: usize,

    /// Feedback counters; absent means no pending critical feedback is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_stats: Option<FeedbackStats>,
}

/// A required field that is not yet filled, with display text for UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingField {
    pub field: String,
    pub hint: String,
}

/// Result of a readiness calculation. Derived on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResult {
    pub item_id: String,
    pub item_type: WorkItemType,
    pub current_phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_phase: Option<Phase>,
    pub is_terminal: bool,
    pub required_percent: f64,
    pub optional_percent: f64,
    /// Blended 0-100 score
    pub readiness_percent: u8,
    pub can_upgrade: bool,
    pub missing_required: Vec<MissingField>,
    pub suggestions: Vec<String>,
}

/// Field check tables per `(type, phase)`. Terminal phases have no table.
///
/// The match is exhaustive over the closed type/phase enums, so adding a
/// work item type without a table is a compile-time error.
pub fn field_configs(item_type: WorkItemType, current: Phase) -> Option<&'static [PhaseFieldConfig]> {
    use FieldCheck::*;
    match (item_type, current) {
        (WorkItemType::Feature, Phase::Design) => Some(&[
            PhaseFieldConfig {
                field: "purpose",
                weight: 30,
                required: true,
                check: Text { min_len: 10 },
                hint: "Describe why this feature should exist",
            },
            PhaseFieldConfig {
                field: "acceptance_criteria",
                weight: 30,
                required: true,
                check: Text { min_len: 10 },
                hint: "List the conditions that make this feature done",
            },
            PhaseFieldConfig {
                field: "has_scope",
                weight: 20,
                required: true,
                check: HasScope,
                hint: "Add timeline items or fill in the scope field",
            },
            PhaseFieldConfig {
                field: "user_impact",
                weight: 10,
                required: false,
                check: Text { min_len: 10 },
                hint: "Note who benefits and how",
            },
            PhaseFieldConfig {
                field: "success_metrics",
                weight: 10,
                required: false,
                check: Text { min_len: 10 },
                hint: "Define how success will be measured",
            },
        ]),
        (WorkItemType::Feature, Phase::Build) => Some(&[
            PhaseFieldConfig {
                field: "progress",
                weight: 40,
                required: true,
                check: ProgressAtLeast(80.0),
                hint: "Implementation should be at least 80% complete",
            },
            PhaseFieldConfig {
                field: "implementation_notes",
                weight: 30,
                required: true,
                check: Text { min_len: 10 },
                hint: "Summarize what was built and any tradeoffs",
            },
            PhaseFieldConfig {
                field: "demo_url",
                weight: 15,
                required: false,
                check: Text { min_len: 1 },
                hint: "Link a demo or preview build",
            },
            PhaseFieldConfig {
                field: "test_coverage",
                weight: 15,
                required: false,
                check: NumberAtLeast(50.0),
                hint: "Cover at least half the new code with tests",
            },
        ]),
        (WorkItemType::Feature, Phase::Refine) => Some(&[
            PhaseFieldConfig {
                field: "feedback_addressed",
                weight: 40,
                required: true,
                check: FeedbackAddressed,
                hint: "Resolve all pending critical feedback",
            },
            PhaseFieldConfig {
                field: "qa_signoff",
                weight: 30,
                required: true,
                check: BoolTrue,
                hint: "Get QA sign-off before launch",
            },
            PhaseFieldConfig {
                field: "release_notes",
                weight: 20,
                required: false,
                check: Text { min_len: 10 },
                hint: "Draft user-facing release notes",
            },
            PhaseFieldConfig {
                field: "docs_updated",
                weight: 10,
                required: false,
                check: BoolTrue,
                hint: "Update documentation for the change",
            },
        ]),
        (WorkItemType::Concept, Phase::Ideation) => Some(&[
            PhaseFieldConfig {
                field: "summary",
                weight: 40,
                required: true,
                check: Text { min_len: 10 },
                hint: "Summarize the idea in a few sentences",
            },
            PhaseFieldConfig {
                field: "problem_statement",
                weight: 30,
                required: true,
                check: Text { min_len: 10 },
                hint: "State the problem this concept addresses",
            },
            PhaseFieldConfig {
                field: "target_audience",
                weight: 15,
                required: false,
                check: Text { min_len: 5 },
                hint: "Identify who this is for",
            },
            PhaseFieldConfig {
                field: "inspiration",
                weight: 15,
                required: false,
                check: Text { min_len: 5 },
                hint: "Link prior art or inspiration",
            },
        ]),
        (WorkItemType::Concept, Phase::Research) => Some(&[
            PhaseFieldConfig {
                field: "findings",
                weight: 40,
                required: true,
                check: Text { min_len: 10 },
                hint: "Write up what the research found",
            },
            PhaseFieldConfig {
                field: "feasibility_confirmed",
                weight: 30,
                required: true,
                check: BoolTrue,
                hint: "Confirm the concept is feasible",
            },
            PhaseFieldConfig {
                field: "competitor_analysis",
                weight: 20,
                required: false,
                check: Text { min_len: 10 },
                hint: "Survey existing solutions",
            },
            PhaseFieldConfig {
                field: "decision_date",
                weight: 10,
                required: false,
                check: DatePresent,
                hint: "Set a date for the go/no-go decision",
            },
        ]),
        (WorkItemType::Bug, Phase::Triage) => Some(&[
            PhaseFieldConfig {
                field: "description",
                weight: 30,
                required: true,
                check: Text { min_len: 10 },
                hint: "Describe the observed behavior",
            },
            PhaseFieldConfig {
                field: "reproduction_steps",
                weight: 40,
                required: true,
                check: Text { min_len: 10 },
                hint: "List steps to reproduce the bug",
            },
            PhaseFieldConfig {
                field: "affected_component",
                weight: 15,
                required: false,
                check: Text { min_len: 1 },
                hint: "Name the affected component",
            },
            PhaseFieldConfig {
                field: "environment",
                weight: 15,
                required: false,
                check: Text { min_len: 1 },
                hint: "Record the environment it occurs in",
            },
        ]),
        (WorkItemType::Bug, Phase::Investigating) => Some(&[
            PhaseFieldConfig {
                field: "root_cause",
                weight: 50,
                required: true,
                check: Text { min_len: 10 },
                hint: "Identify the root cause before fixing",
            },
            PhaseFieldConfig {
                field: "suspected_commit",
                weight: 25,
                required: false,
                check: Text { min_len: 1 },
                hint: "Link the commit that likely introduced it",
            },
            PhaseFieldConfig {
                field: "investigation_notes",
                weight: 25,
                required: false,
                check: Text { min_len: 10 },
                hint: "Keep notes on what was ruled out",
            },
        ]),
        (WorkItemType::Bug, Phase::Fixing) => Some(&[
            PhaseFieldConfig {
                field: "fix_description",
                weight: 30,
                required: true,
                check: Text { min_len: 10 },
                hint: "Describe the fix",
            },
            PhaseFieldConfig {
                field: "progress",
                weight: 40,
                required: true,
                check: ProgressAtLeast(80.0),
                hint: "The fix should be at least 80% complete",
            },
            PhaseFieldConfig {
                field: "regression_test_added",
                weight: 30,
                required: false,
                check: BoolTrue,
                hint: "Add a regression test for the fix",
            },
        ]),
        // Terminal phases score nothing further. Rejected is listed here for
        // concepts even though it sits outside the forward order.
        (WorkItemType::Feature, Phase::Launch)
        | (WorkItemType::Concept, Phase::Validated)
        | (WorkItemType::Concept, Phase::Rejected)
        | (WorkItemType::Bug, Phase::Verified) => None,
        // Phases that belong to other types; resolve() rejects these before
        // scoring, so no table exists.
        _ => None,
    }
}

/// Evaluate one field check against the item and injected inputs.
///
/// A wrong-typed value fails the check; a note is appended to `notes` so
/// the mismatch surfaces in suggestions instead of being silently ignored.
fn is_filled(
    cfg: &PhaseFieldConfig,
    item: &WorkItem,
    inputs: &ComputedInputs,
    notes: &mut Vec<String>,
) -> bool {
    let value = item.fields.get(cfg.field);
    let wrong_type = |notes: &mut Vec<String>| {
        notes.push(format!("Field '{}' has an unexpected value type", cfg.field));
        false
    };
    match cfg.check {
        FieldCheck::Text { min_len } => match value {
            Some(FieldValue::Text(s)) => s.trim().len() >= min_len,
            Some(_) => wrong_type(notes),
            None => false,
        },
        FieldCheck::NumberAtLeast(min) => match value {
            Some(FieldValue::Number(n)) => *n >= min,
            Some(_) => wrong_type(notes),
            None => false,
        },
        FieldCheck::BoolTrue => match value {
            Some(FieldValue::Bool(b)) => *b,
            Some(_) => wrong_type(notes),
            None => false,
        },
        FieldCheck::DatePresent => match value {
            Some(FieldValue::Date(_)) => true,
            Some(_) => wrong_type(notes),
            None => false,
        },
        FieldCheck::ProgressAtLeast(min) => item.progress_percent.is_some_and(|p| p >= min),
        FieldCheck::HasScope => {
            inputs.timeline_items_count >= MIN_TIMELINE_ITEMS
                || item
                    .fields
                    .get("scope")
                    .and_then(|v| v.as_text())
                    .is_some_and(|s| !s.trim().is_empty())
        }
        FieldCheck::FeedbackAddressed => inputs
            .feedback_stats
            .is_none_or(|s| s.pending_critical == 0),
    }
}

/// Pool score: 100 * filled weight / total weight, defined as 100 when the
/// pool is empty or carries only zero weights.
fn pool_percent(filled: u32, total: u32) -> f64 {
    if total == 0 {
        100.0
    } else {
        100.0 * f64::from(filled) / f64::from(total)
    }
}

/// Score a field config slice against an item. Split out from
/// [`calculate_readiness`] so custom tables can be exercised directly.
pub(crate) fn score_fields(
    configs: &[PhaseFieldConfig],
    item: &WorkItem,
    inputs: &ComputedInputs,
) -> (f64, f64, Vec<MissingField>, Vec<String>) {
    let mut required_total = 0u32;
    let mut required_filled = 0u32;
    let mut optional_total = 0u32;
    let mut optional_filled = 0u32;
    let mut missing_required = Vec::new();
    let mut missing_optional = Vec::new();
    let mut notes = Vec::new();

    for cfg in configs {
        let filled = is_filled(cfg, item, inputs, &mut notes);
        if cfg.required {
            required_total += cfg.weight;
            if filled {
                required_filled += cfg.weight;
            } else {
                missing_required.push(MissingField {
                    field: cfg.field.to_string(),
                    hint: cfg.hint.to_string(),
                });
            }
        } else {
            optional_total += cfg.weight;
            if filled {
                optional_filled += cfg.weight;
            } else {
                missing_optional.push(cfg.field);
            }
        }
    }

    let mut suggestions = Vec::new();
    if !missing_required.is_empty() {
        let names: Vec<&str> = missing_required.iter().map(|m| m.field.as_str()).collect();
        suggestions.push(format!(
            "Complete {} required field(s) before advancing: {}",
            missing_required.len(),
            names.join(", ")
        ));
    }
    if !missing_optional.is_empty() {
        suggestions.push(format!(
            "Optional fields would strengthen readiness: {}",
            missing_optional.join(", ")
        ));
    }
    suggestions.extend(notes);

    (
        pool_percent(required_filled, required_total),
        pool_percent(optional_filled, optional_total),
        missing_required,
        suggestions,
    )
}

/// Compute readiness for one work item.
///
/// Errors with [`crate::Error::UnknownPhase`] when the item's phase label
/// does not resolve for its type. A terminal phase short-circuits to 100%
/// with `can_upgrade == false`.
pub fn calculate_readiness(item: &WorkItem, inputs: &ComputedInputs) -> Result<ReadinessResult> {
    let current = phase::resolve(item.item_type, &item.phase)?;
    let next = phase::next_phase(item.item_type, current);
    let terminal = phase::is_terminal(item.item_type, current);

    let Some(configs) = field_configs(item.item_type, current) else {
        return Ok(ReadinessResult {
            item_id: item.id.clone(),
            item_type: item.item_type,
            current_phase: current,
            next_phase: next,
            is_terminal: terminal,
            required_percent: 100.0,
            optional_percent: 100.0,
            readiness_percent: 100,
            can_upgrade: false,
            missing_required: Vec::new(),
            suggestions: Vec::new(),
        });
    };

    let (required_percent, optional_percent, missing_required, suggestions) =
        score_fields(configs, item, inputs);

    let blended = required_percent * REQUIRED_BLEND + optional_percent * OPTIONAL_BLEND;
    let readiness_percent = blended.round().clamp(0.0, 100.0) as u8;
    let can_upgrade = required_percent >= 100.0 && readiness_percent >= UPGRADE_THRESHOLD;

    debug!(
        item = %item.id,
        phase = %current,
        required = required_percent,
        optional = optional_percent,
        readiness = readiness_percent,
        can_upgrade,
        "readiness computed"
    );

    Ok(ReadinessResult {
        item_id: item.id.clone(),
        item_type: item.item_type,
        current_phase: current,
        next_phase: next,
        is_terminal: terminal,
        required_percent,
        optional_percent,
        readiness_percent,
        can_upgrade,
        missing_required,
        suggestions,
    })
}

/// Score every item in a slice, merging results into a map keyed by item
/// id. Per-item failures (unknown phases) are collected alongside the
/// successes; one bad item never aborts the batch. Items are independent,
/// so callers may also fan this out across threads and merge.
pub fn readiness_for_all(
    items: &[WorkItem],
    inputs_by_id: &HashMap<String, ComputedInputs>,
) -> (HashMap<String, ReadinessResult>, Vec<(String, crate::Error)>) {
    let mut results = HashMap::new();
    let mut errors = Vec::new();
    let default_inputs = ComputedInputs::default();
    for item in items {
        let inputs = inputs_by_id.get(&item.id).unwrap_or(&default_inputs);
        match calculate_readiness(item, inputs) {
            Ok(result) => {
                results.insert(item.id.clone(), result);
            }
            Err(e) => errors.push((item.id.clone(), e)),
        }
    }
    (results, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn feature_in(phase: &str) -> WorkItem {
        let mut item = WorkItem::new("wi-f1".into(), WorkItemType::Feature, "Dark mode".into());
        item.phase = phase.to_string();
        item
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_terminal_phase_is_fully_ready_but_not_upgradable() {
        for (ty, phase) in [
            (WorkItemType::Feature, "launch"),
            (WorkItemType::Concept, "validated"),
            (WorkItemType::Concept, "rejected"),
            (WorkItemType::Bug, "verified"),
        ] {
            let mut item = WorkItem::new("wi-1".into(), ty, "t".into());
            item.phase = phase.to_string();
            let result = calculate_readiness(&item, &ComputedInputs::default()).unwrap();
            assert_eq!(result.readiness_percent, 100, "{ty}/{phase}");
            assert!(!result.can_upgrade, "{ty}/{phase}");
            assert!(result.is_terminal, "{ty}/{phase}");
        }
    }

    #[test]
    fn test_unknown_phase_is_an_error_not_a_default() {
        let item = feature_in("shipping");
        let result = calculate_readiness(&item, &ComputedInputs::default());
        assert!(matches!(result, Err(Error::UnknownPhase { .. })));
    }

    #[test]
    fn test_design_scenario_two_of_three_required_filled() {
        // purpose filled (12 chars), acceptance_criteria empty, 2 timeline
        // items giving has_scope. Required pool: 50 of 80 points.
        let mut item = feature_in("design");
        item.fields.insert("purpose".into(), text("dark UI mode"));
        item.fields.insert("acceptance_criteria".into(), text(""));
        let inputs = ComputedInputs {
            timeline_items_count: 2,
            feedback_stats: None,
        };

        let result = calculate_readiness(&item, &inputs).unwrap();
        assert_eq!(result.required_percent, 62.5);
        assert_eq!(result.optional_percent, 0.0);
        // round(62.5 * 0.7 + 0 * 0.3) = 44
        assert_eq!(result.readiness_percent, 44);
        assert!(!result.can_upgrade);
        assert_eq!(result.missing_required.len(), 1);
        assert_eq!(result.missing_required[0].field, "acceptance_criteria");
        assert!(!result.missing_required[0].hint.is_empty());
    }

    #[test]
    fn test_required_complete_but_weak_optional_blocks_upgrade() {
        let mut item = feature_in("design");
        item.fields.insert("purpose".into(), text("dark UI mode"));
        item.fields
            .insert("acceptance_criteria".into(), text("toggle persists across restarts"));
        let inputs = ComputedInputs {
            timeline_items_count: 3,
            feedback_stats: None,
        };

        let result = calculate_readiness(&item, &inputs).unwrap();
        assert_eq!(result.required_percent, 100.0);
        // 100 * 0.7 + 0 * 0.3 = 70, below the 80 bar
        assert_eq!(result.readiness_percent, 70);
        assert!(!result.can_upgrade);
    }

    #[test]
    fn test_can_upgrade_requires_both_conditions() {
        let mut item = feature_in("design");
        item.fields.insert("purpose".into(), text("dark UI mode"));
        item.fields
            .insert("acceptance_criteria".into(), text("toggle persists across restarts"));
        item.fields
            .insert("user_impact".into(), text("reduces eye strain at night"));
        let inputs = ComputedInputs {
            timeline_items_count: 1,
            feedback_stats: None,
        };

        let result = calculate_readiness(&item, &inputs).unwrap();
        assert_eq!(result.required_percent, 100.0);
        // 100 * 0.7 + 50 * 0.3 = 85
        assert_eq!(result.readiness_percent, 85);
        assert!(result.can_upgrade);

        // The converse: can_upgrade implies the two conditions.
        assert!(result.required_percent >= 100.0);
        assert!(result.readiness_percent >= UPGRADE_THRESHOLD);
    }

    #[test]
    fn test_progress_threshold_has_no_partial_credit() {
        let mut item = feature_in("build");
        item.fields
            .insert("implementation_notes".into(), text("built behind a feature flag"));

        item.progress_percent = Some(79.0);
        let result = calculate_readiness(&item, &ComputedInputs::default()).unwrap();
        assert!(result
            .missing_required
            .iter()
            .any(|m| m.field == "progress"));

        item.progress_percent = Some(80.0);
        let result = calculate_readiness(&item, &ComputedInputs::default()).unwrap();
        assert_eq!(result.required_percent, 100.0);
    }

    #[test]
    fn test_has_scope_via_scope_field_without_timeline_items() {
        let mut item = feature_in("design");
        item.fields.insert("purpose".into(), text("dark UI mode"));
        item.fields
            .insert("acceptance_criteria".into(), text("toggle persists across restarts"));
        item.fields.insert("scope".into(), text("settings page only"));

        let result = calculate_readiness(&item, &ComputedInputs::default()).unwrap();
        assert_eq!(result.required_percent, 100.0);
    }

    #[test]
    fn test_feedback_addressed_blocks_on_pending_critical() {
        let mut item = feature_in("refine");
        item.fields.insert("qa_signoff".into(), FieldValue::Bool(true));

        let inputs = ComputedInputs {
            timeline_items_count: 0,
            feedback_stats: Some(FeedbackStats { pending_critical: 2 }),
        };
        let result = calculate_readiness(&item, &inputs).unwrap();
        assert!(result
            .missing_required
            .iter()
            .any(|m| m.field == "feedback_addressed"));

        // Absent stats mean no pending critical feedback is known.
        let result = calculate_readiness(&item, &ComputedInputs::default()).unwrap();
        assert!(!result
            .missing_required
            .iter()
            .any(|m| m.field == "feedback_addressed"));
    }

    #[test]
    fn test_zero_required_pool_scores_100() {
        const OPTIONAL_ONLY: &[PhaseFieldConfig] = &[
            PhaseFieldConfig {
                field: "notes",
                weight: 50,
                required: false,
                check: FieldCheck::Text { min_len: 1 },
                hint: "Add notes",
            },
            PhaseFieldConfig {
                field: "archived_reason",
                weight: 0,
                required: false,
                check: FieldCheck::Text { min_len: 1 },
                hint: "Why was this archived",
            },
        ];
        let item = feature_in("design");
        let (required, optional, missing, _) =
            score_fields(OPTIONAL_ONLY, &item, &ComputedInputs::default());
        assert_eq!(required, 100.0);
        assert_eq!(optional, 0.0);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_zero_weight_required_field_documents_without_scoring() {
        const WITH_ZERO: &[PhaseFieldConfig] = &[
            PhaseFieldConfig {
                field: "title",
                weight: 0,
                required: true,
                check: FieldCheck::Text { min_len: 1 },
                hint: "Give it a title",
            },
            PhaseFieldConfig {
                field: "summary",
                weight: 50,
                required: true,
                check: FieldCheck::Text { min_len: 1 },
                hint: "Summarize",
            },
        ];
        let mut item = feature_in("design");
        item.fields.insert("summary".into(), text("a summary"));
        let (required, _, missing, _) =
            score_fields(WITH_ZERO, &item, &ComputedInputs::default());
        // Zero-weight field is still listed as missing but does not drag the score.
        assert_eq!(required, 100.0);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].field, "title");
    }

    #[test]
    fn test_wrong_typed_value_fails_check_and_is_noted() {
        let mut item = feature_in("design");
        item.fields.insert("purpose".into(), FieldValue::Number(7.0));
        let result = calculate_readiness(&item, &ComputedInputs::default()).unwrap();
        assert!(result.missing_required.iter().any(|m| m.field == "purpose"));
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.contains("unexpected value type")));
    }

    #[test]
    fn test_every_non_terminal_phase_has_a_table() {
        for ty in WorkItemType::all() {
            for p in phase::phases_for(*ty) {
                if phase::is_terminal(*ty, *p) {
                    assert!(field_configs(*ty, *p).is_none(), "{ty}/{p}");
                } else {
                    assert!(field_configs(*ty, *p).is_some(), "{ty}/{p}");
                }
            }
        }
        assert!(field_configs(WorkItemType::Concept, Phase::Rejected).is_none());
    }

    #[test]
    fn test_readiness_for_all_collects_errors_without_aborting() {
        let mut good = feature_in("design");
        good.id = "wi-good".into();
        let mut bad = feature_in("warp_speed");
        bad.id = "wi-bad".into();

        let (results, errors) =
            readiness_for_all(&[good, bad], &HashMap::new());
        assert_eq!(results.len(), 1);
        assert!(results.contains_key("wi-good"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "wi-bad");
    }

    #[test]
    fn test_legacy_phase_is_scored_under_its_migrated_table() {
        let mut item = feature_in("planning");
        item.fields.insert("purpose".into(), text("dark UI mode"));
        let result = calculate_readiness(&item, &ComputedInputs::default()).unwrap();
        assert_eq!(result.current_phase, Phase::Design);
        assert_eq!(result.next_phase, Some(Phase::Build));
    }
}
