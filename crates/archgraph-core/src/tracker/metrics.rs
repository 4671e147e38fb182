//! Graph-wide metrics snapshot.
//!
//! # Metrics Provided
//!
//! - **nodes**: every id appearing as a reference source or target.
//! - **edges**: every registered reference, duplicates included.
//! - **cycles**: number of cycles reported by
//!   [`detect_cycles`](super::cycles::detect_cycles).
//! - **components**: weakly connected components (edges treated as
//!   undirected).
//! - **density**: `edges / (nodes * (nodes - 1))`; zero for fewer than two
//!   nodes. Duplicate edges can push it above 1.0.
//!
//! The snapshot is computed on demand and never cached.

use petgraph::algo::connected_components;

use crate::registry::DependencyGraph;

use super::cycles::detect_cycles;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphMetrics {
    pub nodes: usize,
    pub edges: usize,
    pub cycles: usize,
    pub components: usize,
    pub density: f64,
}

impl GraphMetrics {
    #[must_use]
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let nodes = graph.node_count();
        let edges = graph.edge_count();

        Self {
            nodes,
            edges,
            cycles: detect_cycles(graph).len(),
            components: connected_components(graph.inner()),
            density: compute_density(nodes, edges),
        }
    }

    /// Return `true` if the graph has no edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edges == 0
    }

    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.cycles > 0
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}
