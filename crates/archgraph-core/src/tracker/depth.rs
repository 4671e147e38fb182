//! Dependency depth: length of the longest simple path to a sink.
//!
//! # Cycles
//!
//! An edge into a node that is currently on the DFS stack is skipped: it
//! adds neither a hop nor the target's depth. This keeps the search finite
//! and makes `A → B → A` report depth 1 from `A` (the simple path `A → B`).
//!
//! A depth is memoized only when no edge in the node's subtree was skipped
//! that way. Such a value does not depend on the active path and can be
//! reused anywhere. Nodes whose subtree touched the active path are
//! recomputed each time they are reached, so acyclic regions stay linear
//! while cyclic regions are searched over simple paths.

use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;
use tracing::trace;

use crate::registry::DependencyGraph;

struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    next: usize,
    best: usize,
    /// Some edge below this node was skipped because it hit the active path.
    truncated: bool,
}

impl Frame {
    fn new(graph: &DependencyGraph, node: NodeIndex) -> Self {
        Self {
            node,
            successors: graph.successors(node),
            next: 0,
            best: 0,
            truncated: false,
        }
    }
}

/// Longest simple path (in hops) from `start` to any reachable sink.
#[must_use]
pub fn longest_path_from(graph: &DependencyGraph, start: NodeIndex) -> usize {
    let mut memo: HashMap<NodeIndex, usize> = HashMap::new();
    let mut on_stack: HashSet<NodeIndex> = HashSet::from([start]);
    let mut call_stack: Vec<Frame> = vec![Frame::new(graph, start)];

    while let Some(frame) = call_stack.last_mut() {
        if let Some(&child) = frame.successors.get(frame.next) {
            frame.next += 1;

            if on_stack.contains(&child) {
                trace!(node = ?frame.node, ?child, "skipping edge into active path");
                frame.truncated = true;
                continue;
            }
            if let Some(&depth) = memo.get(&child) {
                frame.best = frame.best.max(depth + 1);
                continue;
            }

            on_stack.insert(child);
            call_stack.push(Frame::new(graph, child));
            continue;
        }

        let finished_node = frame.node;
        let finished_best = frame.best;
        let truncated = frame.truncated;
        call_stack.pop();
        on_stack.remove(&finished_node);
        if !truncated {
            memo.insert(finished_node, finished_best);
        }

        match call_stack.last_mut() {
            Some(parent) => {
                parent.best = parent.best.max(finished_best + 1);
                parent.truncated |= truncated;
            }
            None => return finished_best,
        }
    }

    0
}
