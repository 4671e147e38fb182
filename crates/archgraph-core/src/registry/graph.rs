//! Directed graph materialized from registered references.
//!
//! # Edge Direction
//!
//! An edge `A → B` means "A references B": A depends on B. Outgoing
//! neighbors are dependencies, incoming neighbors are dependents.
//!
//! ## Canonical Order
//!
//! petgraph iterates a node's edges newest-first, which would make every
//! traversal depend on insertion order. All neighbor queries here return
//! distinct neighbors sorted by id, and [`DependencyGraph::sorted_nodes`]
//! orders nodes by id, so traversal outputs are stable for a given edge set.
//!
//! ## Content Hash
//!
//! [`DependencyGraph::content_hash`] is a BLAKE3 hash of the edge list in
//! registration order. Two graphs built from the same references share a
//! hash.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument};

use super::ElementReference;

/// Edge weight: the reference kind plus its optional description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEdge {
    pub kind: String,
    pub description: Option<String>,
}

/// A read-only directed graph over element ids.
///
/// Nodes are the union of every source and target id, inserted in order of
/// first appearance. Every registered reference is one edge, so duplicates
/// and self-loops are preserved. Targets absent from the model still become
/// nodes.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ReferenceEdge>,
    node_map: HashMap<String, NodeIndex>,
    content_hash: String,
}

impl DependencyGraph {
    /// Build a graph from references in O(E).
    #[must_use]
    #[instrument(skip_all, fields(references = references.len()))]
    pub fn from_references(references: &[ElementReference]) -> Self {
        let mut graph = DiGraph::<String, ReferenceEdge>::with_capacity(
            references.len(),
            references.len(),
        );
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        for reference in references {
            let source = intern(&mut graph, &mut node_map, &reference.source);
            let target = intern(&mut graph, &mut node_map, &reference.target);
            graph.add_edge(
                source,
                target,
                ReferenceEdge {
                    kind: reference.kind.clone(),
                    description: reference.description.clone(),
                },
            );
        }

        let content_hash = compute_edge_hash(references);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built dependency graph"
        );

        Self {
            graph,
            node_map,
            content_hash,
        }
    }

    /// Build a graph from bare `(source, target)` pairs with a generic
    /// `references` kind.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let references: Vec<ElementReference> = pairs
            .iter()
            .map(|&(source, target)| ElementReference::new(source, target, "references"))
            .collect();
        Self::from_references(&references)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Return the element id label for a node.
    #[must_use]
    pub fn node_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// The underlying petgraph structure.
    #[must_use]
    pub const fn inner(&self) -> &DiGraph<String, ReferenceEdge> {
        &self.graph
    }

    /// All node indices ordered by element id.
    #[must_use]
    pub fn sorted_nodes(&self) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        nodes.sort_unstable_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        nodes
    }

    /// Distinct neighbors of `idx` in `direction`, sorted by element id.
    #[must_use]
    pub fn neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(idx, direction).collect();
        neighbors.sort_unstable_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        neighbors.dedup();
        neighbors
    }

    /// Distinct dependencies of `idx` (outgoing), sorted by id.
    #[must_use]
    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(idx, Direction::Outgoing)
    }

    /// Distinct dependents of `idx` (incoming), sorted by id.
    #[must_use]
    pub fn predecessors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(idx, Direction::Incoming)
    }

    #[must_use]
    pub fn has_neighbors(&self, idx: NodeIndex, direction: Direction) -> bool {
        self.graph.neighbors_directed(idx, direction).next().is_some()
    }

    /// Iterate edges as `(source id, target id, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &ReferenceEdge)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].as_str(),
                self.graph[edge.target()].as_str(),
                edge.weight(),
            )
        })
    }

    /// Kinds of every edge from `source` to `target`, in insertion order.
    #[must_use]
    pub fn edge_kinds(&self, source: &str, target: &str) -> Vec<&str> {
        let (Some(from), Some(to)) = (self.node_index(source), self.node_index(target)) else {
            return Vec::new();
        };
        let mut kinds: Vec<(usize, &str)> = self
            .graph
            .edges_connecting(from, to)
            .map(|edge| (edge.id().index(), edge.weight().kind.as_str()))
            .collect();
        kinds.sort_unstable_by_key(|(pos, _)| *pos);
        kinds.into_iter().map(|(_, kind)| kind).collect()
    }

    /// Id of a node, or `#<index>` for an index outside this graph.
    pub(crate) fn label(&self, idx: NodeIndex) -> String {
        self.graph
            .node_weight(idx)
            .cloned()
            .unwrap_or_else(|| format!("#{}", idx.index()))
    }

    /// Map a list of node indices to their ids.
    pub(crate) fn ids(&self, nodes: impl IntoIterator<Item = NodeIndex>) -> Vec<String> {
        nodes
            .into_iter()
            .map(|idx| self.label(idx))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn intern(
    graph: &mut DiGraph<String, ReferenceEdge>,
    node_map: &mut HashMap<String, NodeIndex>,
    id: &str,
) -> NodeIndex {
    if let Some(&idx) = node_map.get(id) {
        return idx;
    }
    let idx = graph.add_node(id.to_string());
    node_map.insert(id.to_string(), idx);
    idx
}

fn compute_edge_hash(references: &[ElementReference]) -> String {
    let mut hasher = blake3::Hasher::new();
    for reference in references {
        hasher.update(reference.source.as_bytes());
        hasher.update(b"\x00");
        hasher.update(reference.target.as_bytes());
        hasher.update(b"\x00");
        hasher.update(reference.kind.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
