//! Lifecycle phase model.
//!
//! Valid phases, their order, and terminal membership are defined per work
//! item type:
//! - Feature (and enhancements): design -> build -> refine -> launch
//! - Concept: ideation -> research -> validated | rejected
//! - Bug: triage -> investigating -> fixing -> verified
//!
//! Transitions move forward along the type's phase order; the one exception
//! is that a concept may move to the terminal `rejected` phase from any
//! non-terminal phase. Legacy phase labels from the pre-migration schema are
//! mapped here as a pure function; the source record is never rewritten.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::WorkItemType;
use crate::{Error, Result};

/// A lifecycle phase. Membership and order are type-scoped; use
/// [`is_member`] and [`can_transition`] rather than comparing variants
/// across types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    // Feature
    Design,
    Build,
    Refine,
    Launch,
    // Concept
    Ideation,
    Research,
    Validated,
    Rejected,
    // Bug
    Triage,
    Investigating,
    Fixing,
    Verified,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Design => "design",
            Phase::Build => "build",
            Phase::Refine => "refine",
            Phase::Launch => "launch",
            Phase::Ideation => "ideation",
            Phase::Research => "research",
            Phase::Validated => "validated",
            Phase::Rejected => "rejected",
            Phase::Triage => "triage",
            Phase::Investigating => "investigating",
            Phase::Fixing => "fixing",
            Phase::Verified => "verified",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "design" => Ok(Phase::Design),
            "build" => Ok(Phase::Build),
            "refine" => Ok(Phase::Refine),
            "launch" => Ok(Phase::Launch),
            "ideation" => Ok(Phase::Ideation),
            "research" => Ok(Phase::Research),
            "validated" => Ok(Phase::Validated),
            "rejected" => Ok(Phase::Rejected),
            "triage" => Ok(Phase::Triage),
            "investigating" => Ok(Phase::Investigating),
            "fixing" => Ok(Phase::Fixing),
            "verified" => Ok(Phase::Verified),
            _ => Err(format!("Unknown phase: {}", s)),
        }
    }
}

/// Ordered phase list for a type.
///
/// Concept's `rejected` is terminal but sits outside the forward order, so
/// it is not in this list; see [`terminal_phases`] and [`is_member`].
pub fn phases_for(item_type: WorkItemType) -> &'static [Phase] {
    match item_type {
        WorkItemType::Feature => &[Phase::Design, Phase::Build, Phase::Refine, Phase::Launch],
        WorkItemType::Concept => &[Phase::Ideation, Phase::Research, Phase::Validated],
        WorkItemType::Bug => &[
            Phase::Triage,
            Phase::Investigating,
            Phase::Fixing,
            Phase::Verified,
        ],
    }
}

/// Terminal phase subset for a type.
pub fn terminal_phases(item_type: WorkItemType) -> &'static [Phase] {
    match item_type {
        WorkItemType::Feature => &[Phase::Launch],
        WorkItemType::Concept => &[Phase::Validated, Phase::Rejected],
        WorkItemType::Bug => &[Phase::Verified],
    }
}

/// The phase a newly created item of this type starts in.
pub fn initial_phase(item_type: WorkItemType) -> Phase {
    phases_for(item_type)[0]
}

/// Returns true if `phase` is valid for `item_type`.
pub fn is_member(item_type: WorkItemType, phase: Phase) -> bool {
    phases_for(item_type).contains(&phase)
        || (item_type == WorkItemType::Concept && phase == Phase::Rejected)
}

/// Returns true if `phase` is terminal for `item_type`.
pub fn is_terminal(item_type: WorkItemType, phase: Phase) -> bool {
    terminal_phases(item_type).contains(&phase)
}

/// The candidate next phase along the forward order, or `None` when the
/// phase is terminal (or, for concepts, `rejected`).
pub fn next_phase(item_type: WorkItemType, phase: Phase) -> Option<Phase> {
    let order = phases_for(item_type);
    let idx = order.iter().position(|p| *p == phase)?;
    order.get(idx + 1).copied()
}

/// Transition validity: `to` must sit at or after `from` in the type's
/// order, except that a concept may be rejected from any non-terminal
/// phase (re-rejecting a rejected concept is a no-op and allowed).
pub fn can_transition(item_type: WorkItemType, from: Phase, to: Phase) -> bool {
    if !is_member(item_type, from) || !is_member(item_type, to) {
        return false;
    }
    if item_type == WorkItemType::Concept && to == Phase::Rejected {
        return from == Phase::Rejected || !is_terminal(item_type, from);
    }
    let order = phases_for(item_type);
    match (
        order.iter().position(|p| *p == from),
        order.iter().position(|p| *p == to),
    ) {
        (Some(i), Some(j)) => j >= i,
        _ => false,
    }
}

/// Validate a transition, naming both phases on failure.
pub fn validate_transition(item_type: WorkItemType, from: Phase, to: Phase) -> Result<()> {
    if can_transition(item_type, from, to) {
        Ok(())
    } else {
        Err(Error::InvalidTransition {
            item_type,
            from,
            to,
        })
    }
}

/// Resolve a raw phase label to a `Phase` for the given type.
///
/// Current labels are tried first, so resolution is idempotent; legacy
/// labels from the pre-migration schema are mapped deterministically.
/// Unknown `(type, label)` combinations are an error, never a silent
/// default.
pub fn resolve(item_type: WorkItemType, raw: &str) -> Result<Phase> {
    if let Ok(p) = raw.parse::<Phase>() {
        if is_member(item_type, p) {
            return Ok(p);
        }
        return Err(Error::UnknownPhase {
            item_type,
            phase: raw.to_string(),
        });
    }
    migrate_legacy(item_type, raw).ok_or_else(|| Error::UnknownPhase {
        item_type,
        phase: raw.to_string(),
    })
}

/// Legacy label table, keyed by type since a few labels (e.g. "in_progress")
/// were shared across types in the old schema.
fn migrate_legacy(item_type: WorkItemType, raw: &str) -> Option<Phase> {
    match item_type {
        WorkItemType::Feature => match raw {
            "planning" => Some(Phase::Design),
            "in_progress" | "development" => Some(Phase::Build),
            "review" | "testing" => Some(Phase::Refine),
            "completed" | "launched" => Some(Phase::Launch),
            _ => None,
        },
        WorkItemType::Concept => match raw {
            "idea" => Some(Phase::Ideation),
            "exploring" => Some(Phase::Research),
            "approved" => Some(Phase::Validated),
            "discarded" => Some(Phase::Rejected),
            _ => None,
        },
        WorkItemType::Bug => match raw {
            "new" | "open" => Some(Phase::Triage),
            "in_progress" => Some(Phase::Fixing),
            "resolved" => Some(Phase::Verified),
            _ => None,
        },
    }
}
