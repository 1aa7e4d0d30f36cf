//! Depth-bounded breadth-first reachability.
//!
//! Traversal is level-synchronous: all nodes at depth `d` are expanded, in
//! discovery order, before any node at depth `d + 1`. A node is reported once,
//! at the depth it was first reached. Directed graphs follow out-edges only;
//! undirected graphs follow the symmetric adjacency.

use tracing::debug;

use crate::core::graph::SparseGraph;
use crate::core::ids::{ExternalId, NodeId};
use crate::error::{GraphError, Result};

/// Validates a caller-supplied depth bound.
///
/// Bounds past `u32::MAX` saturate: no graph with dense `u32` indices has a
/// path that long, so the result is the same as an unbounded search.
pub fn check_depth(max_depth: i64) -> Result<u32> {
    if max_depth < 1 {
        return Err(GraphError::InvalidDepth(max_depth));
    }
    Ok(u32::try_from(max_depth).unwrap_or(u32::MAX))
}

/// Nodes within `max_depth` hops of `start`, in discovery order, start first.
pub fn bfs(graph: &SparseGraph, start: ExternalId, max_depth: u32) -> Result<Vec<ExternalId>> {
    Ok(bfs_with_depth(graph, start, max_depth)?
        .into_iter()
        .map(|(node, _)| node)
        .collect())
}

/// Same traversal as [`bfs`], paired with each node's hop distance.
pub fn bfs_with_depth(
    graph: &SparseGraph,
    start: ExternalId,
    max_depth: u32,
) -> Result<Vec<(ExternalId, u32)>> {
    if max_depth == 0 {
        return Err(GraphError::InvalidDepth(0));
    }
    let start_id = graph.index_of(start)?;

    let mut seen = vec![false; graph.node_count()];
    let mut order: Vec<(NodeId, u32)> = vec![(start_id, 0)];
    seen[start_id as usize] = true;

    let mut level_start = 0;
    for depth in 1..=max_depth {
        let level_end = order.len();
        if level_start == level_end {
            break;
        }
        for i in level_start..level_end {
            let (node, _) = order[i];
            for &next in graph.out_row(node) {
                if !seen[next as usize] {
                    seen[next as usize] = true;
                    order.push((next, depth));
                }
            }
        }
        level_start = level_end;
    }

    debug!(start, max_depth, found = order.len(), "bfs completed");
    Ok(order
        .into_iter()
        .map(|(id, depth)| (graph.external(id), depth))
        .collect())
}
