//! Sextant - a lifecycle readiness and dependency analysis engine for work tracking.
//!
//! This library provides the core functionality for the `sx` CLI tool:
//! - per-type lifecycle phase model with legacy-phase migration
//! - readiness scoring for advancing a work item out of its current phase
//! - an optional review gate that can block a transition until approved
//! - whole-graph dependency analysis (cycles, critical path, bottlenecks,
//!   health score)
//!
//! Every operation is a pure function over a caller-supplied snapshot; the
//! engine never reads storage, never mutates input records, and holds no
//! shared state between calls.

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod models;
pub mod phase;
pub mod readiness;
pub mod review;

/// Library-level error type for Sextant operations.
///
/// The `Display` strings for state errors are intentionally precise ("no
/// pending review" vs "insufficient role") so callers can surface the exact
/// failed precondition.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown phase '{phase}' for work item type '{item_type}'")]
    UnknownPhase {
        item_type: models::WorkItemType,
        phase: String,
    },

    #[error("invalid transition for {item_type}: '{from}' -> '{to}'")]
    InvalidTransition {
        item_type: models::WorkItemType,
        from: phase::Phase,
        to: phase::Phase,
    },

    #[error("connection '{0}' is a self-loop")]
    SelfLoop(String),

    #[error("work item not found: {0}")]
    NotFound(String),

    #[error("review is not enabled for work item '{0}'")]
    ReviewNotEnabled(String),

    #[error("phase '{phase}' is not reviewable for work item type '{item_type}'")]
    PhaseNotReviewable {
        item_type: models::WorkItemType,
        phase: phase::Phase,
    },

    #[error("review already pending")]
    ReviewAlreadyPending,

    #[error("review already approved")]
    ReviewAlreadyApproved,

    #[error("no pending review")]
    NoPendingReview,

    #[error("insufficient role: {role} cannot {action}")]
    InsufficientRole {
        role: models::Role,
        action: review::ReviewAction,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Sextant operations.
pub type Result<T> = std::result::Result<T, Error>;
