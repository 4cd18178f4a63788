//! CLI argument definitions for Sextant.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sextant - lifecycle readiness and dependency analysis for work tracking.
///
/// Commands read a JSON snapshot (stdin by default) and print JSON results;
/// the engine never touches storage itself.
#[derive(Parser, Debug)]
#[command(name = "sx")]
#[command(author, version, about = "Work item lifecycle readiness and dependency analysis", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a work item's readiness to leave its current phase
    ///
    /// Reads a readiness request: the work item plus caller-computed inputs
    /// (timeline item count, feedback stats).
    Readiness {
        /// Path to the request JSON (defaults to stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Analyze a dependency snapshot: cycles, critical path, bottlenecks, health
    Analyze {
        /// Path to the snapshot JSON (defaults to stdin)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Duration in hours assumed for items without an estimate
        #[arg(long, default_value_t = 8.0)]
        default_duration: f64,

        /// Maximum number of bottlenecks to report
        #[arg(long, default_value_t = 5)]
        max_bottlenecks: usize,
    },

    /// Apply a review-gate action to a work item in a snapshot
    Review {
        /// Path to the snapshot JSON (defaults to stdin)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Work item id
        #[arg(long)]
        item: String,

        /// Target phase the review gates
        #[arg(long)]
        target_phase: String,

        /// One of: request, approve, reject, cancel
        #[arg(long)]
        action: String,

        /// Acting membership role: owner, admin, member, viewer
        #[arg(long)]
        role: String,
    },

    /// Validate a phase transition for a work item type
    Transition {
        /// Work item type: concept, feature, bug
        #[arg(long = "type")]
        item_type: String,

        /// Current phase (legacy labels accepted)
        #[arg(long)]
        from: String,

        /// Proposed phase
        #[arg(long)]
        to: String,
    },
}
