//! Cycle detection over the reference graph.
//!
//! # Algorithm
//!
//! Iterative depth-first search with an explicit on-stack set. Start nodes
//! are taken in id order and neighbors in canonical order, with a global
//! visited set so each node is expanded once. Every edge into a node that is
//! still on the DFS stack closes a cycle: the reported path is the stack
//! suffix from that node to the current one, followed by the node again.
//!
//! A self-loop `A → A` is reported as `[A, A]`. Disjoint cycles are each
//! reported once; a node shared by two cycles can appear in both. The output
//! is fully determined by the edge set.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use tracing::{debug, instrument, trace};

use crate::registry::DependencyGraph;

/// Find every cycle closed by a DFS back-edge.
///
/// Each entry is the literal path `[n0, n1, …, n0]`.
#[must_use]
#[instrument(skip_all, fields(nodes = graph.node_count()))]
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let mut visited: HashSet<NodeIndex> = HashSet::with_capacity(graph.node_count());
    let mut cycles: Vec<Vec<String>> = Vec::new();

    for start in graph.sorted_nodes() {
        if !visited.insert(start) {
            continue;
        }

        let mut path: Vec<NodeIndex> = vec![start];
        let mut on_stack: HashSet<NodeIndex> = HashSet::from([start]);
        // Each frame: (node, its canonical successors, next successor to try).
        let mut call_stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> =
            vec![(start, graph.successors(start), 0)];

        loop {
            let Some(frame) = call_stack.last_mut() else {
                break;
            };
            let current = frame.0;
            let next = frame.1.get(frame.2).copied();
            frame.2 += 1;

            match next {
                Some(neighbor) if on_stack.contains(&neighbor) => {
                    if let Some(pos) = path.iter().position(|&node| node == neighbor) {
                        let mut cycle = graph.ids(path[pos..].iter().copied());
                        cycle.push(graph.label(neighbor));
                        trace!(?cycle, "back-edge closes cycle");
                        cycles.push(cycle);
                    }
                }
                Some(neighbor) => {
                    if visited.insert(neighbor) {
                        path.push(neighbor);
                        on_stack.insert(neighbor);
                        call_stack.push((neighbor, graph.successors(neighbor), 0));
                    }
                }
                None => {
                    call_stack.pop();
                    path.pop();
                    on_stack.remove(&current);
                }
            }
        }
    }

    debug!(cycles = cycles.len(), "cycle detection finished");
    cycles
}
