//! Graph analysis over a dependency snapshot.
//!
//! Runs four passes over the ordering subgraph (active dependency/blocks
//! edges) and the full edge set:
//! - cycle detection (three-color DFS, deduplicated by node set)
//! - critical path (longest duration-weighted path, skipped under cycles)
//! - slack and bottleneck scoring
//! - a composite 0-100 health score (cycles, orphans, unresolved conflicts)
//!
//! All output is pure and deterministic for identical input graphs: node
//! iteration is sorted, and ties are broken by lowest node id.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

use crate::models::graph::{DependencyGraph, GraphIssue};
use crate::models::{Connection, ConnectionKind, ConnectionStatus};

/// Tolerance for floating-point duration comparisons.
const EPS: f64 = 1e-9;

/// Health score penalties.
pub mod penalties {
    /// Points lost per detected cycle.
    pub const CYCLE_PENALTY: f64 = 15.0;
    /// Cap on total cycle penalty.
    pub const CYCLE_PENALTY_CAP: f64 = 45.0;
    /// Points lost per orphaned node.
    pub const ORPHAN_PENALTY: f64 = 5.0;
    /// Cap on total orphan penalty.
    pub const ORPHAN_PENALTY_CAP: f64 = 25.0;
    /// Scale applied to the fraction of conflicts-typed edges still active.
    pub const CONFLICT_PENALTY_SCALE: f64 = 20.0;
}

/// Analyzer tuning knobs.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Duration proxy for nodes without `estimated_hours`.
    pub default_duration_hours: f64,
    /// How many bottlenecks to report.
    pub max_bottlenecks: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_duration_hours: 8.0,
            max_bottlenecks: 5,
        }
    }
}

/// The single cycle edge whose removal is cheapest, ranked by
/// `strength * confidence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedBreak {
    pub source: String,
    pub target: String,
    pub kind: ConnectionKind,
    pub removability: f64,
}

/// One distinct cycle in the ordering subgraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularDependency {
    /// Cycle nodes in traversal order (the last links back to the first)
    pub nodes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_break: Option<SuggestedBreak>,
}

/// Per-node timing from the forward and backward passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub duration_hours: f64,
    pub earliest_finish: f64,
    pub latest_finish: f64,
    pub slack: f64,
    pub on_critical_path: bool,
}

/// Longest duration-weighted path through the ordering subgraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalPathAnalysis {
    pub path: Vec<String>,
    pub total_duration_hours: f64,
    /// Equal-length paths ending at other max-finish sinks; ties are
    /// surfaced, not hidden by the lowest-id selection of `path`
    pub alternates: Vec<Vec<String>>,
    /// Zero-slack nodes on neither `path` nor any alternate
    pub tied_nodes: Vec<String>,
    pub schedule: BTreeMap<String, ScheduleEntry>,
}

/// A node ranked by how much ordering load runs through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bottleneck {
    pub id: String,
    /// Incoming ordering edges (prerequisites)
    pub dependency_count: usize,
    /// Outgoing ordering edges (items waiting on this one)
    pub dependent_count: usize,
    /// Strength-weighted score normalized to [0, 1]
    pub risk: f64,
}

/// Full health report for one dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyHealthCheck {
    pub health_score: u8,
    pub cycles: Vec<CircularDependency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_path: Option<CriticalPathAnalysis>,
    /// True when critical-path computation was skipped because the ordering
    /// subgraph is cyclic
    pub critical_path_skipped: bool,
    pub bottlenecks: Vec<Bottleneck>,
    pub orphans: Vec<String>,
    pub issues: Vec<GraphIssue>,
}

/// Analyze a graph: cycles, critical path, bottlenecks, orphans, health.
pub fn analyze(graph: &DependencyGraph, config: &AnalyzerConfig) -> DependencyHealthCheck {
    let cycles = detect_cycles(graph);
    let critical_path_skipped = !cycles.is_empty();
    let critical_path = if critical_path_skipped {
        None
    } else {
        compute_critical_path(graph, config)
    };
    let bottlenecks = rank_bottlenecks(graph, config.max_bottlenecks);
    let orphans = find_orphans(graph);
    let health_score = health_score(graph, &cycles, &orphans);

    debug!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        cycles = cycles.len(),
        orphans = orphans.len(),
        health_score,
        "graph analysis complete"
    );

    DependencyHealthCheck {
        health_score,
        cycles,
        critical_path,
        critical_path_skipped,
        bottlenecks,
        orphans,
        issues: graph.issues().to_vec(),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Three-color DFS over the ordering subgraph. A back-edge to a gray node
/// reconstructs the cycle from the active recursion path; rediscoveries of
/// the same cycle from other DFS roots are deduplicated by node set.
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<CircularDependency> {
    let succ = graph.ordering_successors();
    let mut color: HashMap<&str, Color> = HashMap::new();
    let mut path: Vec<&str> = Vec::new();
    let mut seen: HashSet<BTreeSet<String>> = HashSet::new();
    let mut cycles = Vec::new();

    for id in graph.node_ids_sorted() {
        if color.get(id).copied().unwrap_or(Color::White) == Color::White {
            dfs(id, graph, &succ, &mut color, &mut path, &mut seen, &mut cycles);
        }
    }
    cycles
}

fn dfs<'a>(
    node: &'a str,
    graph: &'a DependencyGraph,
    succ: &HashMap<&'a str, Vec<&'a Connection>>,
    color: &mut HashMap<&'a str, Color>,
    path: &mut Vec<&'a str>,
    seen: &mut HashSet<BTreeSet<String>>,
    cycles: &mut Vec<CircularDependency>,
) {
    color.insert(node, Color::Gray);
    path.push(node);

    if let Some(edges) = succ.get(node) {
        for edge in edges {
            let next = edge.target.as_str();
            match color.get(next).copied().unwrap_or(Color::White) {
                Color::White => dfs(next, graph, succ, color, path, seen, cycles),
                Color::Gray => {
                    if let Some(pos) = path.iter().position(|n| *n == next) {
                        let nodes: Vec<String> =
                            path[pos..].iter().map(|s| s.to_string()).collect();
                        let key: BTreeSet<String> = nodes.iter().cloned().collect();
                        if seen.insert(key) {
                            let suggested_break = suggest_break(&nodes, graph);
                            cycles.push(CircularDependency {
                                nodes,
                                suggested_break,
                            });
                        }
                    }
                }
                Color::Black => {}
            }
        }
    }

    path.pop();
    color.insert(node, Color::Black);
}

/// The cycle edge with the lowest `strength * confidence` product: the most
/// removable link.
fn suggest_break(cycle: &[String], graph: &DependencyGraph) -> Option<SuggestedBreak> {
    let mut best: Option<SuggestedBreak> = None;
    for i in 0..cycle.len() {
        let source = &cycle[i];
        let target = &cycle[(i + 1) % cycle.len()];
        for edge in graph.ordering_edges() {
            if edge.source == *source && edge.target == *target {
                let removability = edge.removability();
                let better = best
                    .as_ref()
                    .map(|b| removability < b.removability - EPS)
                    .unwrap_or(true);
                if better {
                    best = Some(SuggestedBreak {
                        source: edge.source.clone(),
                        target: edge.target.clone(),
                        kind: edge.kind,
                        removability,
                    });
                }
            }
        }
    }
    best
}

/// Duration proxy for a node: `estimated_hours` when present and sane,
/// otherwise the configured default.
fn duration_of(graph: &DependencyGraph, id: &str, config: &AnalyzerConfig) -> f64 {
    graph
        .nodes()
        .get(id)
        .and_then(|n| n.estimated_hours)
        .filter(|h| h.is_finite() && *h >= 0.0)
        .unwrap_or(config.default_duration_hours)
}

/// Longest path over the acyclic ordering subgraph, by dynamic programming
/// in topological order, plus a backward pass for latest finish and slack.
///
/// Only called once acyclicity is established. Among equal-finish sinks the
/// path ending at the lowest node id is selected; the rest become
/// alternates.
pub fn compute_critical_path(
    graph: &DependencyGraph,
    config: &AnalyzerConfig,
) -> Option<CriticalPathAnalysis> {
    let ids = graph.node_ids_sorted();
    if ids.is_empty() {
        return None;
    }
    let succ = graph.ordering_successors();
    let pred = graph.ordering_predecessors();

    // Kahn's algorithm with a sorted ready set for deterministic order.
    let mut indegree: HashMap<&str, usize> = ids.iter().map(|id| (*id, 0)).collect();
    for edges in succ.values() {
        for edge in edges {
            *indegree.entry(edge.target.as_str()).or_insert(0) += 1;
        }
    }
    let mut ready: BTreeSet<&str> = indegree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut topo: Vec<&str> = Vec::with_capacity(ids.len());
    while let Some(id) = ready.iter().next().copied() {
        ready.remove(id);
        topo.push(id);
        if let Some(edges) = succ.get(id) {
            for edge in edges {
                let target = edge.target.as_str();
                if let Some(d) = indegree.get_mut(target) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(target);
                    }
                }
            }
        }
    }
    if topo.len() != ids.len() {
        // Caller screens for cycles first; an incomplete order means the
        // subgraph was cyclic after all.
        return None;
    }

    // Forward pass: earliest finish and best predecessor. Predecessor lists
    // are sorted by source id, and strict improvement keeps the first, so
    // ties resolve to the lowest id.
    let mut finish: HashMap<&str, f64> = HashMap::with_capacity(ids.len());
    let mut best_pred: HashMap<&str, &str> = HashMap::new();
    for id in &topo {
        let duration = duration_of(graph, id, config);
        let mut base = 0.0;
        let mut chosen: Option<&str> = None;
        if let Some(edges) = pred.get(id) {
            for edge in edges {
                let source = edge.source.as_str();
                let f = finish.get(source).copied().unwrap_or(0.0);
                if f > base + EPS {
                    base = f;
                    chosen = Some(source);
                }
            }
        }
        finish.insert(id, base + duration);
        if let Some(p) = chosen {
            best_pred.insert(id, p);
        }
    }

    let total = finish.values().fold(0.0_f64, |acc, f| acc.max(*f));

    // Max-finish sinks, lowest id first.
    let mut max_sinks: Vec<&str> = topo
        .iter()
        .filter(|id| (finish[*id] - total).abs() < EPS)
        .copied()
        .collect();
    max_sinks.sort_unstable();

    let chain = |end: &str| -> Vec<String> {
        let mut path = vec![end.to_string()];
        let mut cur = end;
        while let Some(p) = best_pred.get(cur) {
            path.push(p.to_string());
            cur = p;
        }
        path.reverse();
        path
    };

    let path = chain(max_sinks[0]);
    let alternates: Vec<Vec<String>> = max_sinks[1..].iter().map(|s| chain(s)).collect();

    // Backward pass: latest finish from sinks, then slack.
    let mut latest: HashMap<&str, f64> = HashMap::with_capacity(ids.len());
    for id in topo.iter().rev() {
        let value = match succ.get(id) {
            Some(edges) if !edges.is_empty() => edges
                .iter()
                .map(|e| {
                    let t = e.target.as_str();
                    latest.get(t).copied().unwrap_or(total) - duration_of(graph, t, config)
                })
                .fold(f64::INFINITY, f64::min),
            _ => total,
        };
        latest.insert(id, value);
    }

    let on_path: HashSet<&str> = path.iter().map(String::as_str).collect();
    let on_alternate: HashSet<&str> = alternates
        .iter()
        .flat_map(|p| p.iter().map(String::as_str))
        .collect();

    let mut schedule = BTreeMap::new();
    let mut tied_nodes = Vec::new();
    for id in &topo {
        let earliest = finish[id];
        let late = latest[id];
        let slack = if (late - earliest).abs() < EPS {
            0.0
        } else {
            late - earliest
        };
        let on_critical = on_path.contains(id);
        if slack == 0.0 && !on_critical && !on_alternate.contains(id) {
            tied_nodes.push(id.to_string());
        }
        schedule.insert(
            id.to_string(),
            ScheduleEntry {
                duration_hours: duration_of(graph, id, config),
                earliest_finish: earliest,
                latest_finish: late,
                slack,
                on_critical_path: on_critical,
            },
        );
    }
    tied_nodes.sort_unstable();

    Some(CriticalPathAnalysis {
        path,
        total_duration_hours: total,
        alternates,
        tied_nodes,
        schedule,
    })
}

/// Rank nodes by strength-weighted incident ordering load; top N, risk
/// normalized against the heaviest node.
pub fn rank_bottlenecks(graph: &DependencyGraph, max: usize) -> Vec<Bottleneck> {
    let mut incoming: HashMap<&str, usize> = HashMap::new();
    let mut outgoing: HashMap<&str, usize> = HashMap::new();
    let mut score: HashMap<&str, f64> = HashMap::new();
    for edge in graph.ordering_edges() {
        *incoming.entry(edge.target.as_str()).or_insert(0) += 1;
        *outgoing.entry(edge.source.as_str()).or_insert(0) += 1;
        *score.entry(edge.target.as_str()).or_insert(0.0) += edge.strength;
        *score.entry(edge.source.as_str()).or_insert(0.0) += edge.strength;
    }

    let max_score = score.values().fold(0.0_f64, |acc, s| acc.max(*s));
    if max_score <= 0.0 {
        return Vec::new();
    }

    let mut ranked: Vec<Bottleneck> = score
        .iter()
        .map(|(id, s)| Bottleneck {
            id: id.to_string(),
            dependency_count: incoming.get(id).copied().unwrap_or(0),
            dependent_count: outgoing.get(id).copied().unwrap_or(0),
            risk: s / max_score,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.risk
            .partial_cmp(&a.risk)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.truncate(max);
    ranked
}

/// Nodes with no incident structurally-valid edge of any kind or status.
pub fn find_orphans(graph: &DependencyGraph) -> Vec<String> {
    graph
        .node_ids_sorted()
        .into_iter()
        .filter(|id| !graph.has_incident_edges(id))
        .map(str::to_string)
        .collect()
}

/// Composite 0-100 health score. Deterministic for identical inputs and
/// monotonically non-increasing as cycles or orphans are added.
pub fn health_score(
    graph: &DependencyGraph,
    cycles: &[CircularDependency],
    orphans: &[String],
) -> u8 {
    use penalties::*;

    let cycle_penalty = (cycles.len() as f64 * CYCLE_PENALTY).min(CYCLE_PENALTY_CAP);
    let orphan_penalty = (orphans.len() as f64 * ORPHAN_PENALTY).min(ORPHAN_PENALTY_CAP);

    let conflict_edges: Vec<&Connection> = graph
        .edges()
        .iter()
        .filter(|e| e.kind == ConnectionKind::Conflicts)
        .collect();
    let conflict_penalty = if conflict_edges.is_empty() {
        0.0
    } else {
        let active = conflict_edges
            .iter()
            .filter(|e| e.status == ConnectionStatus::Active)
            .count();
        CONFLICT_PENALTY_SCALE * active as f64 / conflict_edges.len() as f64
    };

    let score = 100.0 - cycle_penalty - orphan_penalty - conflict_penalty;
    score.clamp(0.0, 100.0).round() as u8
}
