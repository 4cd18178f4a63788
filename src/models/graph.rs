//! Dependency graph model: validated snapshot ingestion and adjacency.
//!
//! `DependencyGraph::from_snapshot` separates structurally valid
//! connections from malformed ones (self-loops, dangling references) and
//! records unresolvable phase labels, so one bad record never aborts
//! analysis of an otherwise-valid graph. The graph is an analysis input
//! only; nothing here mutates the snapshot records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Connection, ConnectionStatus, Snapshot, WorkItem};
use crate::phase;

/// A recoverable problem found while ingesting a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphIssue {
    /// Connection whose source and target are the same node
    SelfLoop { connection_id: String, node: String },
    /// Connection referencing a node not in the supplied set
    DanglingEdge {
        connection_id: String,
        missing: String,
    },
    /// Two work items sharing one id; the later record wins
    DuplicateNode { id: String },
    /// Work item whose phase label does not resolve for its type
    UnknownPhase { node: String, phase: String },
}

/// In-memory node/edge set for one workspace scope.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: HashMap<String, WorkItem>,
    edges: Vec<Connection>,
    issues: Vec<GraphIssue>,
}

impl DependencyGraph {
    /// Build a graph from a snapshot, collecting validation issues instead
    /// of failing.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut issues = Vec::new();

        let mut nodes: HashMap<String, WorkItem> = HashMap::with_capacity(snapshot.nodes.len());
        for item in snapshot.nodes {
            if phase::resolve(item.item_type, &item.phase).is_err() {
                issues.push(GraphIssue::UnknownPhase {
                    node: item.id.clone(),
                    phase: item.phase.clone(),
                });
            }
            let id = item.id.clone();
            if nodes.insert(id.clone(), item).is_some() {
                issues.push(GraphIssue::DuplicateNode { id });
            }
        }

        let mut edges = Vec::with_capacity(snapshot.edges.len());
        for edge in snapshot.edges {
            if edge.source == edge.target {
                issues.push(GraphIssue::SelfLoop {
                    connection_id: edge.id.clone(),
                    node: edge.source.clone(),
                });
                continue;
            }
            let mut dangling = false;
            for endpoint in [&edge.source, &edge.target] {
                if !nodes.contains_key(endpoint) {
                    issues.push(GraphIssue::DanglingEdge {
                        connection_id: edge.id.clone(),
                        missing: endpoint.clone(),
                    });
                    dangling = true;
                }
            }
            if !dangling {
                edges.push(edge);
            }
        }

        Self {
            nodes,
            edges,
            issues,
        }
    }

    /// All work items, keyed by id.
    pub fn nodes(&self) -> &HashMap<String, WorkItem> {
        &self.nodes
    }

    /// Structurally valid connections.
    pub fn edges(&self) -> &[Connection] {
        &self.edges
    }

    /// Validation issues collected at ingestion.
    pub fn issues(&self) -> &[GraphIssue] {
        &self.issues
    }

    /// Node ids in sorted order, for deterministic traversal.
    pub fn node_ids_sorted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Active edges that constrain execution order (dependency/blocks).
    pub fn ordering_edges(&self) -> impl Iterator<Item = &Connection> {
        self.edges
            .iter()
            .filter(|e| e.status == ConnectionStatus::Active && e.is_ordering())
    }

    /// Forward adjacency over the ordering subgraph: source -> its edges,
    /// sorted by target id for deterministic iteration.
    pub fn ordering_successors(&self) -> HashMap<&str, Vec<&Connection>> {
        let mut adj: HashMap<&str, Vec<&Connection>> = HashMap::new();
        for edge in self.ordering_edges() {
            adj.entry(edge.source.as_str()).or_default().push(edge);
        }
        for edges in adj.values_mut() {
            edges.sort_unstable_by(|a, b| a.target.cmp(&b.target));
        }
        adj
    }

    /// Reverse adjacency over the ordering subgraph: target -> its edges,
    /// sorted by source id.
    pub fn ordering_predecessors(&self) -> HashMap<&str, Vec<&Connection>> {
        let mut adj: HashMap<&str, Vec<&Connection>> = HashMap::new();
        for edge in self.ordering_edges() {
            adj.entry(edge.target.as_str()).or_default().push(edge);
        }
        for edges in adj.values_mut() {
            edges.sort_unstable_by(|a, b| a.source.cmp(&b.source));
        }
        adj
    }

    /// True if the node touches any structurally valid edge, in either
    /// direction and of any kind or status.
    pub fn has_incident_edges(&self, id: &str) -> bool {
        self.edges.iter().any(|e| e.source == id || e.target == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConnectionKind, WorkItemType};

    fn item(id: &str) -> WorkItem {
        WorkItem::new(id.to_string(), WorkItemType::Feature, id.to_string())
    }

    fn raw_edge(id: &str, source: &str, target: &str, kind: ConnectionKind) -> Connection {
        // Bypass Connection::new so tests can feed malformed edges, the way
        // a deserialized snapshot can.
        Connection {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            kind,
            strength: 1.0,
            confidence: 1.0,
            is_bidirectional: false,
            status: ConnectionStatus::Active,
        }
    }

    #[test]
    fn test_self_loop_collected_not_dropped_silently() {
        let snapshot = Snapshot {
            nodes: vec![item("a")],
            edges: vec![raw_edge("cx-1", "a", "a", ConnectionKind::Dependency)],
        };
        let graph = DependencyGraph::from_snapshot(snapshot);
        assert!(graph.edges().is_empty());
        assert_eq!(
            graph.issues(),
            &[GraphIssue::SelfLoop {
                connection_id: "cx-1".into(),
                node: "a".into()
            }]
        );
    }

    #[test]
    fn test_dangling_edge_collected_and_analysis_continues() {
        let snapshot = Snapshot {
            nodes: vec![item("a"), item("b")],
            edges: vec![
                raw_edge("cx-1", "a", "b", ConnectionKind::Dependency),
                raw_edge("cx-2", "a", "ghost", ConnectionKind::Blocks),
            ],
        };
        let graph = DependencyGraph::from_snapshot(snapshot);
        assert_eq!(graph.edges().len(), 1);
        assert!(matches!(
            graph.issues()[0],
            GraphIssue::DanglingEdge { ref missing, .. } if missing == "ghost"
        ));
    }

    #[test]
    fn test_unknown_phase_recorded_as_issue() {
        let mut bad = item("a");
        bad.phase = "warp_speed".into();
        let snapshot = Snapshot {
            nodes: vec![bad, item("b")],
            edges: vec![],
        };
        let graph = DependencyGraph::from_snapshot(snapshot);
        assert_eq!(graph.nodes().len(), 2);
        assert!(matches!(
            graph.issues()[0],
            GraphIssue::UnknownPhase { ref node, .. } if node == "a"
        ));
    }

    #[test]
    fn test_ordering_edges_filter_kind_and_status() {
        let mut inactive = raw_edge("cx-3", "a", "c", ConnectionKind::Dependency);
        inactive.status = ConnectionStatus::Inactive;
        let snapshot = Snapshot {
            nodes: vec![item("a"), item("b"), item("c")],
            edges: vec![
                raw_edge("cx-1", "a", "b", ConnectionKind::Dependency),
                raw_edge("cx-2", "b", "c", ConnectionKind::RelatesTo),
                inactive,
            ],
        };
        let graph = DependencyGraph::from_snapshot(snapshot);
        let ordering: Vec<&str> = graph.ordering_edges().map(|e| e.id.as_str()).collect();
        assert_eq!(ordering, vec!["cx-1"]);
    }

    #[test]
    fn test_adjacency_is_sorted() {
        let snapshot = Snapshot {
            nodes: vec![item("a"), item("b"), item("c")],
            edges: vec![
                raw_edge("cx-1", "a", "c", ConnectionKind::Dependency),
                raw_edge("cx-2", "a", "b", ConnectionKind::Blocks),
            ],
        };
        let graph = DependencyGraph::from_snapshot(snapshot);
        let succ = graph.ordering_successors();
        let targets: Vec<&str> = succ["a"].iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["b", "c"]);
        assert_eq!(graph.node_ids_sorted(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_incident_edges_any_kind_counts() {
        let snapshot = Snapshot {
            nodes: vec![item("a"), item("b"), item("c")],
            edges: vec![raw_edge("cx-1", "a", "b", ConnectionKind::RelatesTo)],
        };
        let graph = DependencyGraph::from_snapshot(snapshot);
        assert!(graph.has_incident_edges("a"));
        assert!(graph.has_incident_edges("b"));
        assert!(!graph.has_incident_edges("c"));
    }
}
