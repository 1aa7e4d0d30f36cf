use crate::core::graph::{Directedness, SparseGraph};
use crate::core::ids::ExternalId;
use crate::error::Result;
use crate::ingest::edge_list::Edge;

/// Edges of `graph` whose endpoints both lie in `nodes`.
///
/// Undirected edges come out once each; parallel edges stay parallel.
pub fn induced_edges(graph: &SparseGraph, nodes: &[ExternalId]) -> Result<Vec<Edge>> {
    let mut members = vec![false; graph.node_count()];
    let mut ids = Vec::with_capacity(nodes.len());
    for &node in nodes {
        let id = graph.index_of(node)?;
        if !members[id as usize] {
            members[id as usize] = true;
            ids.push(id);
        }
    }

    let undirected = graph.directedness() == Directedness::Undirected;
    let mut edges = vec![];
    for &src in &ids {
        // an undirected self-loop sits twice in its own row
        let mut loop_copy = false;
        for &dst in graph.out_row(src) {
            if !members[dst as usize] {
                continue;
            }
            if undirected {
                // every other edge sits in both rows, keep the copy from the lower index
                if dst < src {
                    continue;
                }
                if dst == src {
                    loop_copy = !loop_copy;
                    if !loop_copy {
                        continue;
                    }
                }
            }
            edges.push((graph.external(src), graph.external(dst)));
        }
    }
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::bfs::bfs;
    use crate::error::GraphError;

    #[test]
    fn test_directed_bfs_neighborhood() {
        let g = SparseGraph::build([(0, 1), (1, 2), (2, 0), (1, 3), (3, 4)], Directedness::Directed)
            .unwrap();
        let nodes = bfs(&g, 0, 2).unwrap();

        let edges = induced_edges(&g, &nodes).unwrap();
        assert_eq!(vec![(0, 1), (1, 2), (1, 3), (2, 0)], edges);
    }

    #[test]
    fn test_undirected_edges_once() {
        let g = SparseGraph::build([(0, 1), (1, 2), (0, 1), (2, 2)], Directedness::Undirected)
            .unwrap();

        let edges = induced_edges(&g, &[0, 1, 2]).unwrap();
        assert_eq!(vec![(0, 1), (0, 1), (1, 2), (2, 2)], edges);
    }

    #[test]
    fn test_undirected_parallel_self_loops() {
        let g = SparseGraph::build([(3, 3), (3, 4), (3, 3)], Directedness::Undirected).unwrap();

        let edges = induced_edges(&g, &[3, 4]).unwrap();
        assert_eq!(vec![(3, 3), (3, 4), (3, 3)], edges);
    }

    #[test]
    fn test_unknown_node() {
        let g = SparseGraph::build([(0, 1)], Directedness::Directed).unwrap();
        assert!(matches!(
            induced_edges(&g, &[0, 5]),
            Err(GraphError::NodeNotFound(5))
        ));
    }
}
