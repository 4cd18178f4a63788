//! Review gate: a secondary approval state machine that can block a phase
//! transition independent of field readiness.
//!
//! The gate is keyed by `(work item, target phase)` and moves
//! unset -> pending -> {approved, rejected}; a rejected review may be
//! re-requested, an approved one is terminal. Which phases are reviewable
//! and which transitions are blocked until approval is a per-type static
//! map. All permission checks are pure predicates over `(action, role)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::models::{ReviewStatus, Role, WorkItem, WorkItemType};
use crate::phase::{self, Phase};
use crate::{Error, Result};

/// An action against the review gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Request,
    Approve,
    Reject,
    Cancel,
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewAction::Request => "request",
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
            ReviewAction::Cancel => "cancel",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ReviewAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "request" => Ok(ReviewAction::Request),
            "approve" => Ok(ReviewAction::Approve),
            "reject" => Ok(ReviewAction::Reject),
            "cancel" => Ok(ReviewAction::Cancel),
            _ => Err(format!("Unknown review action: {}", s)),
        }
    }
}

/// Phases whose work is reviewable for a type.
pub fn reviewable_phases(item_type: WorkItemType) -> &'static [Phase] {
    match item_type {
        WorkItemType::Feature => &[Phase::Build, Phase::Refine],
        WorkItemType::Concept => &[Phase::Research],
        WorkItemType::Bug => &[Phase::Fixing],
    }
}

/// Target phases that stay blocked until the review is approved.
pub fn blocked_phases(item_type: WorkItemType) -> &'static [Phase] {
    match item_type {
        WorkItemType::Feature => &[Phase::Launch],
        WorkItemType::Concept => &[Phase::Validated],
        WorkItemType::Bug => &[Phase::Verified],
    }
}

/// Role predicate for a review action. Owners and admins satisfy every
/// check that also admits members; viewers can perform no action.
pub fn role_allows(action: ReviewAction, role: Role) -> bool {
    match action {
        ReviewAction::Approve | ReviewAction::Reject => {
            matches!(role, Role::Owner | Role::Admin)
        }
        ReviewAction::Request | ReviewAction::Cancel => {
            matches!(role, Role::Owner | Role::Admin | Role::Member)
        }
    }
}

/// Returns true iff review is enabled for the item, `target` is in the
/// blocked set for its type, and the current review status is not approved.
pub fn is_phase_blocked_by_review(item: &WorkItem, target: Phase) -> bool {
    item.review_enabled
        && blocked_phases(item.item_type).contains(&target)
        && item.review_status != Some(ReviewStatus::Approved)
}

/// Outcome of a successfully applied review action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewActionResult {
    pub item_id: String,
    pub target_phase: Phase,
    pub action: ReviewAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<ReviewStatus>,
    /// `None` means the gate returned to unset (a canceled request)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<ReviewStatus>,
}

/// Apply a review action for `(item, target_phase)` without mutating the
/// item; the caller persists the returned status.
///
/// Failures name the precise precondition: review not enabled, phase not
/// reviewable, insufficient role, review already pending/approved, or no
/// pending review.
pub fn apply_action(
    item: &WorkItem,
    target_phase: Phase,
    action: ReviewAction,
    role: Role,
) -> Result<ReviewActionResult> {
    if !item.review_enabled {
        return Err(Error::ReviewNotEnabled(item.id.clone()));
    }
    let gated = reviewable_phases(item.item_type).contains(&target_phase)
        || blocked_phases(item.item_type).contains(&target_phase);
    if !gated {
        return Err(Error::PhaseNotReviewable {
            item_type: item.item_type,
            phase: target_phase,
        });
    }
    if !role_allows(action, role) {
        return Err(Error::InsufficientRole { role, action });
    }

    let previous = item.review_status;
    let new_status = match action {
        ReviewAction::Request => match previous {
            Some(ReviewStatus::Pending) => return Err(Error::ReviewAlreadyPending),
            Some(ReviewStatus::Approved) => return Err(Error::ReviewAlreadyApproved),
            None | Some(ReviewStatus::Rejected) => Some(ReviewStatus::Pending),
        },
        ReviewAction::Approve => match previous {
            Some(ReviewStatus::Pending) => Some(ReviewStatus::Approved),
            _ => return Err(Error::NoPendingReview),
        },
        ReviewAction::Reject => match previous {
            Some(ReviewStatus::Pending) => Some(ReviewStatus::Rejected),
            _ => return Err(Error::NoPendingReview),
        },
        ReviewAction::Cancel => match previous {
            Some(ReviewStatus::Pending) => None,
            _ => return Err(Error::NoPendingReview),
        },
    };

    debug!(item = %item.id, target = %target_phase, %action, "review action applied");

    Ok(ReviewActionResult {
        item_id: item.id.clone(),
        target_phase,
        action,
        previous_status: previous,
        new_status,
    })
}

/// Convenience check used by callers wiring readiness to the gate: is the
/// item's candidate next phase blocked?
pub fn next_phase_blocked(item: &WorkItem, current: Phase) -> bool {
    phase::next_phase(item.item_type, current)
        .map(|next| is_phase_blocked_by_review(item, next))
        .unwrap_or(false)
}
