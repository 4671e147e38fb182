//! Projection engine: rule-constrained traversal across layers.
//!
//! # Overview
//!
//! A projection answers "what in layer B does element X (in layer A)
//! effectively depend on", following declared layer-to-layer rules instead
//! of raw edge kinds. Traversal is breadth-first over the reference graph;
//! an edge is followed only when
//!
//! 1. a rule exists from the current node's layer to the next node's layer,
//!    and
//! 2. the next node's layer is the requested layer, or the requested layer
//!    is still reachable from it through the rule set.
//!
//! Layers come from the [`ArchitectureModel`]; graph nodes missing from the
//! model (broken references) have no layer and are never entered.
//!
//! ## Determinism
//!
//! Each node is reported once with a witness path of minimum hop count.
//! Among equal-length paths the one discovered first in canonical (id-sorted)
//! neighbor order wins.
//!
//! ## Limits
//!
//! Traversal stops expanding at [`ProjectionEngine::max_depth`] hops. Deeper
//! matches are silently dropped.

pub mod rules;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::{debug, instrument, trace};

use crate::config::AnalysisConfig;
use crate::model::ArchitectureModel;
use crate::registry::DependencyGraph;

pub use rules::{ProjectionRule, RuleTable};

pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Hop bound for [`ProjectionEngine::reachable_default`].
pub const DEFAULT_REACHABILITY_DEPTH: usize = 5;

/// An element reached by a projection, with the path used to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedElement {
    pub id: String,
    pub layer: String,
    /// Traversal path from the starting element to `id`, both ends included.
    pub path: Vec<String>,
}

impl ProjectedElement {
    /// Number of hops on the witness path.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Rule-free reachability result: each node at its minimum hop distance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reachability {
    depths: BTreeMap<String, usize>,
}

impl Reachability {
    #[must_use]
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.depths.get(id).copied()
    }

    /// Node ids grouped by discovery depth, ids sorted within each group.
    #[must_use]
    pub fn by_depth(&self) -> BTreeMap<usize, Vec<String>> {
        let mut grouped: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (id, &depth) in &self.depths {
            grouped.entry(depth).or_default().push(id.clone());
        }
        grouped
    }

    #[must_use]
    pub const fn depths(&self) -> &BTreeMap<String, usize> {
        &self.depths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ProjectionEngine
// ---------------------------------------------------------------------------

/// Rule-guided traversal over one graph snapshot.
///
/// The rule table belongs to this engine instance; it changes only through
/// [`add_rule`](Self::add_rule), [`remove_rule`](Self::remove_rule) and
/// [`clear_rules`](Self::clear_rules).
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    graph: DependencyGraph,
    rules: RuleTable,
    max_depth: usize,
    reachability_depth: usize,
}

impl ProjectionEngine {
    #[must_use]
    pub fn new(graph: DependencyGraph) -> Self {
        Self {
            graph,
            rules: RuleTable::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            reachability_depth: DEFAULT_REACHABILITY_DEPTH,
        }
    }

    /// Engine seeded with the configured rules and depth limits.
    #[must_use]
    pub fn from_config(graph: DependencyGraph, config: &AnalysisConfig) -> Self {
        Self {
            graph,
            rules: config.projection.rules.iter().cloned().collect(),
            max_depth: config.projection.max_depth,
            reachability_depth: config.reachability.default_max_depth,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_reachability_depth(mut self, depth: usize) -> Self {
        self.reachability_depth = depth;
        self
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[must_use]
    pub const fn reachability_depth(&self) -> usize {
        self.reachability_depth
    }

    #[must_use]
    pub const fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Install or replace the rule for its layer pair.
    pub fn add_rule(&mut self, rule: ProjectionRule) {
        if let Some(previous) = self.rules.insert(rule) {
            trace!(
                source = %previous.source_layer,
                target = %previous.target_layer,
                "replaced projection rule"
            );
        }
    }

    pub fn remove_rule(&mut self, source_layer: &str, target_layer: &str) {
        self.rules.remove(source_layer, target_layer);
    }

    /// Snapshot of the current rules; changing it does not affect the engine.
    #[must_use]
    pub fn rules(&self) -> Vec<ProjectionRule> {
        self.rules.to_vec()
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    /// Whether some rule chain leads from `source_layer` to `target_layer`.
    #[must_use]
    pub fn can_project(&self, source_layer: &str, target_layer: &str) -> bool {
        self.rules
            .reachable_layers(source_layer)
            .contains(target_layer)
    }

    #[must_use]
    pub fn reachable_layers(&self, layer: &str) -> BTreeSet<String> {
        self.rules.reachable_layers(layer)
    }

    /// Elements in `target_layer` that `source_id` depends on through
    /// rule-permitted paths.
    #[must_use]
    #[instrument(skip(self, model))]
    pub fn project(
        &self,
        model: &ArchitectureModel,
        source_id: &str,
        target_layer: &str,
    ) -> Vec<ProjectedElement> {
        let viable = self.rules.layers_reaching(target_layer);
        let results = self.guided_search(
            model,
            source_id,
            Direction::Outgoing,
            |from_layer, to_layer| {
                self.rules.allows(from_layer, to_layer)
                    && (to_layer == target_layer || viable.contains(to_layer))
            },
            target_layer,
        );
        debug!(matches = results.len(), "projection finished");
        results
    }

    /// Elements in `source_layer` that ultimately depend on `target_id`
    /// through rule-permitted paths.
    ///
    /// Paths run from `target_id` back to the upstream element.
    #[must_use]
    #[instrument(skip(self, model))]
    pub fn project_reverse(
        &self,
        model: &ArchitectureModel,
        target_id: &str,
        source_layer: &str,
    ) -> Vec<ProjectedElement> {
        let viable = self.rules.reachable_layers(source_layer);
        let results = self.guided_search(
            model,
            target_id,
            Direction::Incoming,
            |current_layer, upstream_layer| {
                self.rules.allows(upstream_layer, current_layer)
                    && (upstream_layer == source_layer || viable.contains(upstream_layer))
            },
            source_layer,
        );
        debug!(matches = results.len(), "reverse projection finished");
        results
    }

    /// Every node reachable from `source_id` within `max_depth` hops,
    /// ignoring rules.
    #[must_use]
    pub fn reachable(
        &self,
        model: &ArchitectureModel,
        source_id: &str,
        max_depth: usize,
    ) -> Reachability {
        let Some(start) = self.start_node(model, source_id) else {
            return Reachability::default();
        };

        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(start, 0)]);
        let mut depths: BTreeMap<String, usize> = BTreeMap::new();

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for next in self.graph.successors(current) {
                if visited.insert(next) {
                    depths.insert(self.graph.label(next), depth + 1);
                    queue.push_back((next, depth + 1));
                }
            }
        }

        Reachability { depths }
    }

    /// [`reachable`](Self::reachable) bounded by the engine's configured
    /// reachability depth.
    #[must_use]
    pub fn reachable_default(&self, model: &ArchitectureModel, source_id: &str) -> Reachability {
        self.reachable(model, source_id, self.reachability_depth)
    }

    fn start_node(&self, model: &ArchitectureModel, id: &str) -> Option<NodeIndex> {
        if !model.contains(id) {
            return None;
        }
        self.graph.node_index(id)
    }

    /// Breadth-first search from `start_id` in `direction`, stepping from a
    /// node in layer `a` to a neighbor in layer `b` only when `step(a, b)`.
    /// Collects visited nodes whose layer equals `wanted_layer`.
    fn guided_search(
        &self,
        model: &ArchitectureModel,
        start_id: &str,
        direction: Direction,
        step: impl Fn(&str, &str) -> bool,
        wanted_layer: &str,
    ) -> Vec<ProjectedElement> {
        let Some(start) = self.start_node(model, start_id) else {
            return Vec::new();
        };
        if self.rules.is_empty() {
            return Vec::new();
        }

        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(start, 0)]);
        let mut results: Vec<ProjectedElement> = Vec::new();

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= self.max_depth {
                trace!(node = %self.graph.label(current), "depth limit reached");
                continue;
            }
            let Some(current_layer) = self.graph.node_id(current).and_then(|id| model.layer_of(id))
            else {
                continue;
            };

            for next in self.graph.neighbors(current, direction) {
                if visited.contains(&next) {
                    continue;
                }
                let Some(next_layer) = self.graph.node_id(next).and_then(|id| model.layer_of(id))
                else {
                    continue;
                };
                if !step(current_layer, next_layer) {
                    continue;
                }

                visited.insert(next);
                parent.insert(next, current);
                queue.push_back((next, depth + 1));

                if next_layer == wanted_layer {
                    results.push(ProjectedElement {
                        id: self.graph.label(next),
                        layer: next_layer.to_string(),
                        path: self.graph.ids(trace_back(&parent, start, next)),
                    });
                }
            }
        }

        results
    }
}

fn trace_back(
    parent: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    end: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![end];
    let mut cursor = end;
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
