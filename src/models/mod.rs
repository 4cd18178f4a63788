//! Data models for Sextant entities.
//!
//! This module defines the core data structures:
//! - `WorkItem` - A trackable unit (concept, feature, or bug) with a
//!   type-scoped lifecycle phase and a bag of typed field values
//! - `Connection` - A directed, typed, weighted relationship between items
//! - `Snapshot` - The analysis input: work items plus connections
//! - `Role` / `ReviewStatus` - Review gate membership roles and gate state

pub mod graph;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::phase;
use crate::{Error, Result};

/// Work item type. Enhancement is a boolean flag on `Feature`, not a
/// distinct type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemType {
    Concept,
    Feature,
    Bug,
}

impl WorkItemType {
    /// Get all work item types.
    pub fn all() -> &'static [WorkItemType] {
        &[WorkItemType::Concept, WorkItemType::Feature, WorkItemType::Bug]
    }
}

impl fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkItemType::Concept => "concept",
            WorkItemType::Feature => "feature",
            WorkItemType::Bug => "bug",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for WorkItemType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "concept" => Ok(WorkItemType::Concept),
            "feature" => Ok(WorkItemType::Feature),
            "bug" => Ok(WorkItemType::Bug),
            _ => Err(format!("Unknown work item type: {}", s)),
        }
    }
}

/// A typed field value on a work item.
///
/// Untagged so snapshots carry plain JSON scalars. `Date` is tried before
/// `Text` so RFC 3339 strings deserialize as dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

impl FieldValue {
    /// Text content, if this value is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content, if this value is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean content, if this value is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Review gate status for one work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// Workspace membership role used for review gate permission checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Viewer => "viewer",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            "viewer" => Ok(Role::Viewer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A unit of work tracked in a workspace.
///
/// The `phase` string is type-scoped and may be a legacy label; it is
/// normalized through [`crate::phase::resolve`] at analysis time, never
/// rewritten in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier (e.g., "wi-a1b2")
    pub id: String,

    /// Work item type
    #[serde(rename = "type")]
    pub item_type: WorkItemType,

    /// Item title
    pub title: String,

    /// Current lifecycle phase (raw label, possibly legacy)
    pub phase: String,

    /// Enhancement flag (features only)
    #[serde(default)]
    pub is_enhancement: bool,

    /// Typed field values whose relevance depends on type and phase
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,

    /// Completion percentage (features and bugs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<f64>,

    /// Duration proxy for critical-path analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// Whether the review gate applies to this item
    #[serde(default)]
    pub review_enabled: bool,

    /// Current review gate status (unset when no review was ever requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_status: Option<ReviewStatus>,
}

impl WorkItem {
    /// Create a new work item in its type's initial phase.
    pub fn new(id: String, item_type: WorkItemType, title: String) -> Self {
        Self {
            id,
            item_type,
            title,
            phase: phase::initial_phase(item_type).to_string(),
            is_enhancement: false,
            fields: HashMap::new(),
            progress_percent: None,
            estimated_hours: None,
            review_enabled: false,
            review_status: None,
        }
    }
}

/// Type of relationship between two work items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    /// Target cannot start until source completes
    Dependency,
    /// Source prevents target from progressing
    Blocks,
    /// Source makes target possible but does not constrain order
    Enables,
    /// Items strengthen each other
    Complements,
    /// Items are in tension; both being active is a smell
    Conflicts,
    /// Informational link
    RelatesTo,
    /// Source is a duplicate of target
    Duplicates,
    /// Source replaces target
    Supersedes,
}

impl ConnectionKind {
    /// Returns true if this kind constrains execution order and therefore
    /// participates in cycle and critical-path analysis.
    pub fn is_ordering(&self) -> bool {
        matches!(self, ConnectionKind::Dependency | ConnectionKind::Blocks)
    }

    /// Returns true if this kind is always directional, even when the
    /// connection is flagged bidirectional.
    pub fn is_directional_only(&self) -> bool {
        matches!(self, ConnectionKind::Duplicates | ConnectionKind::Supersedes)
    }

    /// Get all connection kinds.
    pub fn all() -> &'static [ConnectionKind] {
        &[
            ConnectionKind::Dependency,
            ConnectionKind::Blocks,
            ConnectionKind::Enables,
            ConnectionKind::Complements,
            ConnectionKind::Conflicts,
            ConnectionKind::RelatesTo,
            ConnectionKind::Duplicates,
            ConnectionKind::Supersedes,
        ]
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionKind::Dependency => "dependency",
            ConnectionKind::Blocks => "blocks",
            ConnectionKind::Enables => "enables",
            ConnectionKind::Complements => "complements",
            ConnectionKind::Conflicts => "conflicts",
            ConnectionKind::RelatesTo => "relates_to",
            ConnectionKind::Duplicates => "duplicates",
            ConnectionKind::Supersedes => "supersedes",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ConnectionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dependency" => Ok(ConnectionKind::Dependency),
            "blocks" => Ok(ConnectionKind::Blocks),
            "enables" => Ok(ConnectionKind::Enables),
            "complements" => Ok(ConnectionKind::Complements),
            "conflicts" => Ok(ConnectionKind::Conflicts),
            "relates_to" => Ok(ConnectionKind::RelatesTo),
            "duplicates" => Ok(ConnectionKind::Duplicates),
            "supersedes" => Ok(ConnectionKind::Supersedes),
            _ => Err(format!("Unknown connection kind: {}", s)),
        }
    }
}

/// Lifecycle status of a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Active,
    Inactive,
    Rejected,
    PendingReview,
}

/// A directed, typed, weighted relationship between two work items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique identifier (e.g., "cx-a1b2")
    pub id: String,

    /// Source work item ID
    pub source: String,

    /// Target work item ID
    pub target: String,

    /// Type of relationship
    pub kind: ConnectionKind,

    /// Relationship strength in [0, 1]
    #[serde(default = "default_strength")]
    pub strength: f64,

    /// Confidence in [0, 1]; below 1.0 when proposed by automated analysis
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Whether the edge is also traversed in reverse for reachability
    #[serde(default)]
    pub is_bidirectional: bool,

    /// Lifecycle status
    #[serde(default)]
    pub status: ConnectionStatus,
}

fn default_strength() -> f64 {
    1.0
}

fn default_confidence() -> f64 {
    1.0
}

impl Connection {
    /// Create a new active connection.
    ///
    /// Self-loops are rejected here rather than silently dropped during
    /// analysis.
    pub fn new(id: String, source: String, target: String, kind: ConnectionKind) -> Result<Self> {
        if source == target {
            return Err(Error::SelfLoop(id));
        }
        Ok(Self {
            id,
            source,
            target,
            kind,
            strength: 1.0,
            confidence: 1.0,
            is_bidirectional: false,
            status: ConnectionStatus::Active,
        })
    }

    /// Returns true if this connection constrains execution order.
    pub fn is_ordering(&self) -> bool {
        self.kind.is_ordering()
    }

    /// Returns true if traversal may follow this edge in reverse.
    /// Duplicates/supersedes edges stay directional regardless of the flag.
    pub fn traverses_both_ways(&self) -> bool {
        self.is_bidirectional && !self.kind.is_directional_only()
    }

    /// Product of strength and confidence, used to rank how removable an
    /// edge is when suggesting a cycle break.
    pub fn removability(&self) -> f64 {
        self.strength * self.confidence
    }
}

/// A consistency snapshot of one workspace: work items plus connections.
///
/// The caller is responsible for taking a consistent read before handing
/// this to the engine; nothing here is re-read mid-computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<WorkItem>,

    #[serde(default)]
    pub edges: Vec<Connection>,
}
