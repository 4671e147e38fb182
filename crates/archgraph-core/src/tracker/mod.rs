//! Dependency tracker: graph algorithms over a fixed reference graph.
//!
//! # Overview
//!
//! [`DependencyTracker`] owns an immutable [`DependencyGraph`] snapshot and
//! answers structural questions about it. Edge `A → B` means A depends on B,
//! so B is one of A's dependencies and A is one of B's dependents.
//!
//! ## Missing Ids
//!
//! The tracker never asserts model consistency. An id that is not in the
//! graph yields an empty set, a zero count, or `None`.
//!
//! ## Submodules
//!
//! - [`cycles`] — DFS back-edge cycle detection.
//! - [`depth`] — memoized longest-path depth.
//! - [`metrics`] — node/edge/cycle/component snapshot.

pub mod cycles;
pub mod depth;
pub mod metrics;

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::instrument;

use crate::registry::{DependencyGraph, ReferenceRegistry};

pub use metrics::GraphMetrics;

#[derive(Debug, Clone)]
pub struct DependencyTracker {
    graph: DependencyGraph,
}

impl DependencyTracker {
    #[must_use]
    pub const fn new(graph: DependencyGraph) -> Self {
        Self { graph }
    }

    #[must_use]
    pub fn from_registry(registry: &ReferenceRegistry) -> Self {
        Self::new(registry.dependency_graph())
    }

    #[must_use]
    pub const fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Elements that reference `id` directly.
    #[must_use]
    pub fn dependents(&self, id: &str) -> BTreeSet<String> {
        self.direct(id, Direction::Incoming)
    }

    /// Elements `id` references directly.
    #[must_use]
    pub fn dependencies(&self, id: &str) -> BTreeSet<String> {
        self.direct(id, Direction::Outgoing)
    }

    /// Everything that reaches `id` through any number of hops, excluding
    /// `id` itself.
    #[must_use]
    pub fn transitive_dependents(&self, id: &str) -> BTreeSet<String> {
        self.closure(id, Direction::Incoming)
    }

    /// Everything `id` reaches through any number of hops, excluding `id`
    /// itself.
    #[must_use]
    pub fn transitive_dependencies(&self, id: &str) -> BTreeSet<String> {
        self.closure(id, Direction::Outgoing)
    }

    /// See [`cycles::detect_cycles`].
    #[must_use]
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        cycles::detect_cycles(&self.graph)
    }

    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.detect_cycles().is_empty()
    }

    #[must_use]
    #[instrument(skip(self))]
    pub fn metrics(&self) -> GraphMetrics {
        GraphMetrics::from_graph(&self.graph)
    }

    /// Elements nothing references (in-degree 0).
    #[must_use]
    pub fn source_elements(&self) -> BTreeSet<String> {
        self.without_neighbors(Direction::Incoming)
    }

    /// Elements that reference nothing (out-degree 0).
    #[must_use]
    pub fn sink_elements(&self) -> BTreeSet<String> {
        self.without_neighbors(Direction::Outgoing)
    }

    /// How many elements transitively depend on `id`.
    #[must_use]
    pub fn impact_radius(&self, id: &str) -> usize {
        self.transitive_dependents(id).len()
    }

    /// Longest simple path from `id` to a sink; see [`depth`] for the cycle
    /// policy.
    #[must_use]
    pub fn dependency_depth(&self, id: &str) -> usize {
        self.graph
            .node_index(id)
            .map_or(0, |idx| depth::longest_path_from(&self.graph, idx))
    }

    /// Minimum-hop path from `from` to `to`, optionally bounded by
    /// `max_depth` hops.
    ///
    /// Ties resolve to the path found first in canonical neighbor order.
    /// Returns `None` when either id is unknown, `from == to`, or no path
    /// exists within the bound.
    #[must_use]
    pub fn shortest_path(
        &self,
        from: &str,
        to: &str,
        max_depth: Option<usize>,
    ) -> Option<Vec<String>> {
        let start = self.graph.node_index(from)?;
        let goal = self.graph.node_index(to)?;
        if start == goal {
            return None;
        }

        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(start, 0)]);

        while let Some((current, hops)) = queue.pop_front() {
            if max_depth.is_some_and(|limit| hops >= limit) {
                continue;
            }
            for next in self.graph.successors(current) {
                if !visited.insert(next) {
                    continue;
                }
                parent.insert(next, current);
                if next == goal {
                    return Some(self.graph.ids(reconstruct_path(&parent, start, goal)));
                }
                queue.push_back((next, hops + 1));
            }
        }

        None
    }

    fn direct(&self, id: &str, direction: Direction) -> BTreeSet<String> {
        self.graph
            .node_index(id)
            .map(|idx| {
                self.graph
                    .ids(self.graph.neighbors(idx, direction))
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn closure(&self, id: &str, direction: Direction) -> BTreeSet<String> {
        let Some(seed) = self.graph.node_index(id) else {
            return BTreeSet::new();
        };

        let mut visited: HashSet<NodeIndex> = HashSet::from([seed]);
        let mut stack: Vec<NodeIndex> = vec![seed];
        let mut reached: BTreeSet<String> = BTreeSet::new();

        while let Some(current) = stack.pop() {
            for next in self.graph.neighbors(current, direction) {
                if visited.insert(next) {
                    reached.insert(self.graph.label(next));
                    stack.push(next);
                }
            }
        }

        reached
    }

    fn without_neighbors(&self, direction: Direction) -> BTreeSet<String> {
        self.graph
            .inner()
            .node_indices()
            .filter(|&idx| !self.graph.has_neighbors(idx, direction))
            .map(|idx| self.graph.label(idx))
            .collect()
    }
}

/// Walk parent links back from `goal` and return the path `start → … → goal`.
fn reconstruct_path(
    parent: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    goal: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        let Some(&prev) = parent.get(&cursor) else {
            break;
        };
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(pairs: &[(&str, &str)]) -> DependencyTracker {
        DependencyTracker::new(DependencyGraph::from_pairs(pairs))
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| (*id).to_string()).collect()
    }

    #[test]
    fn direct_neighbors() {
        let t = tracker(&[("A", "B"), ("A", "C"), ("D", "A")]);

        assert_eq!(t.dependencies("A"), set(&["B", "C"]));
        assert_eq!(t.dependents("A"), set(&["D"]));
        assert!(t.dependencies("B").is_empty());
    }

    #[test]
    fn self_loop_appears_in_both_directions() {
        let t = tracker(&[("A", "A"), ("A", "B")]);

        assert!(t.dependencies("A").contains("A"));
        assert!(t.dependents("A").contains("A"));
    }

    #[test]
    fn unknown_id_degrades_to_empty() {
        let t = tracker(&[("A", "B")]);

        assert!(t.dependencies("Z").is_empty());
        assert!(t.dependents("Z").is_empty());
        assert!(t.transitive_dependencies("Z").is_empty());
        assert_eq!(t.impact_radius("Z"), 0);
        assert_eq!(t.dependency_depth("Z"), 0);
        assert!(t.shortest_path("Z", "A", None).is_none());
    }

    #[test]
    fn transitive_closure_excludes_seed_in_cycle() {
        let t = tracker(&[("A", "B"), ("B", "C"), ("C", "A")]);

        assert_eq!(t.transitive_dependencies("A"), set(&["B", "C"]));
        assert_eq!(t.transitive_dependents("A"), set(&["B", "C"]));
    }

    #[test]
    fn sources_and_sinks() {
        // A → B → C, D → C, E → E
        let t = tracker(&[("A", "B"), ("B", "C"), ("D", "C"), ("E", "E")]);

        assert_eq!(t.source_elements(), set(&["A", "D"]));
        assert_eq!(t.sink_elements(), set(&["C"]));
    }

    #[test]
    fn impact_radius_counts_transitive_dependents() {
        let t = tracker(&[("A", "C"), ("B", "C"), ("X", "A")]);
        assert_eq!(t.impact_radius("C"), 3);
        assert_eq!(t.impact_radius("X"), 0);
    }

    #[test]
    fn shortest_path_prefers_fewest_hops() {
        // A → B → C → D and A → D
        let t = tracker(&[("A", "B"), ("B", "C"), ("C", "D"), ("A", "D")]);
        assert_eq!(
            t.shortest_path("A", "D", None),
            Some(vec!["A".to_string(), "D".to_string()])
        );
    }

    #[test]
    fn shortest_path_ties_break_on_neighbor_order() {
        // A → B → D and A → C → D
        let t = tracker(&[("A", "C"), ("C", "D"), ("A", "B"), ("B", "D")]);
        assert_eq!(
            t.shortest_path("A", "D", None),
            Some(vec!["A".to_string(), "B".to_string(), "D".to_string()])
        );
    }

    #[test]
    fn shortest_path_respects_depth_bound() {
        let t = tracker(&[("A", "B"), ("B", "C"), ("C", "D")]);
        assert!(t.shortest_path("A", "D", Some(2)).is_none());
        assert_eq!(t.shortest_path("A", "D", Some(3)).map(|p| p.len()), Some(4));
        assert!(t.shortest_path("D", "A", None).is_none());
        assert!(t.shortest_path("A", "A", None).is_none());
    }
}
