use tracing::info;

use crate::core::graph::{DegreeSelection, SparseGraph};
use crate::core::ids::{ExternalId, NodeId};
use crate::error::{GraphError, Result};

#[derive(Debug, PartialEq, Eq)]
pub struct DegreeStats {
    pub in_deg: usize,
    pub out_deg: usize,
    /// In plus out when directed, adjacency length when undirected.
    pub total: usize,
}

/// Read-only degree queries over a built graph.
pub struct DegreeIndex<'a> {
    graph: &'a SparseGraph,
}

impl<'a> DegreeIndex<'a> {
    pub fn new(graph: &'a SparseGraph) -> Self {
        Self { graph }
    }

    pub fn stats(&self, node: ExternalId) -> Result<DegreeStats> {
        let id = self.graph.index_of(node)?;
        Ok(DegreeStats {
            in_deg: self.graph.in_degree_of(id),
            out_deg: self.graph.out_degree_of(id),
            total: self.graph.degree_of(id, DegreeSelection::Total),
        })
    }

    /// Node with the largest selected degree.
    ///
    /// Ties go to the smallest input identifier, so the answer does not depend
    /// on line order in the input.
    pub fn node_of_max_degree(&self, selection: DegreeSelection) -> Result<ExternalId> {
        if self.graph.is_empty() {
            return Err(GraphError::EmptyGraph);
        }

        let mut best: Option<(usize, ExternalId)> = None;
        for (id, &ext) in self.graph.nodes().iter().enumerate() {
            let deg = self.graph.degree_of(id as NodeId, selection);
            let better = match best {
                None => true,
                Some((best_deg, best_ext)) => {
                    deg > best_deg || (deg == best_deg && ext < best_ext)
                }
            };
            if better {
                best = Some((deg, ext));
            }
        }

        let (deg, node) = best.ok_or(GraphError::EmptyGraph)?;
        info!(node, degree = deg, ?selection, "max degree node");
        Ok(node)
    }

    /// Top `k` nodes by selected degree, highest first, ties by identifier.
    pub fn ranking(&self, selection: DegreeSelection, k: usize) -> Vec<(ExternalId, usize)> {
        let mut ranked = self
            .graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(id, &ext)| (ext, self.graph.degree_of(id as NodeId, selection)))
            .collect::<Vec<_>>();

        let by_rank =
            |a: &(ExternalId, usize), b: &(ExternalId, usize)| b.1.cmp(&a.1).then(a.0.cmp(&b.0));
        if k < ranked.len() {
            ranked.select_nth_unstable_by(k, by_rank);
            ranked.truncate(k);
        }
        ranked.sort_unstable_by(by_rank);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::Directedness;

    fn scenario(directedness: Directedness) -> SparseGraph {
        SparseGraph::build([(0, 1), (1, 2), (2, 0), (1, 3)], directedness).unwrap()
    }

    #[test]
    fn test_max_degree_directed() {
        let g = scenario(Directedness::Directed);
        let idx = DegreeIndex::new(&g);

        assert_eq!(1, idx.node_of_max_degree(DegreeSelection::Total).unwrap());
        assert_eq!(1, idx.node_of_max_degree(DegreeSelection::Out).unwrap());
        // all in-degrees are 1: smallest id wins
        assert_eq!(0, idx.node_of_max_degree(DegreeSelection::In).unwrap());
    }

    #[test]
    fn test_max_degree_undirected() {
        let g = scenario(Directedness::Undirected);
        assert_eq!(
            1,
            DegreeIndex::new(&g)
                .node_of_max_degree(DegreeSelection::Total)
                .unwrap()
        );
    }

    #[test]
    fn test_tie_break_independent_of_input_order() {
        let a = SparseGraph::build([(9, 8), (3, 4)], Directedness::Directed).unwrap();
        let b = SparseGraph::build([(3, 4), (9, 8)], Directedness::Directed).unwrap();

        for g in [&a, &b] {
            let idx = DegreeIndex::new(g);
            assert_eq!(3, idx.node_of_max_degree(DegreeSelection::Out).unwrap());
        }
    }

    #[test]
    fn test_empty_graph() {
        let g = SparseGraph::build([], Directedness::Directed).unwrap();
        assert!(matches!(
            DegreeIndex::new(&g).node_of_max_degree(DegreeSelection::Total),
            Err(GraphError::EmptyGraph)
        ));
    }

    #[test]
    fn test_stats() {
        let g = scenario(Directedness::Directed);
        let idx = DegreeIndex::new(&g);
        assert_eq!(
            DegreeStats {
                in_deg: 1,
                out_deg: 2,
                total: 3
            },
            idx.stats(1).unwrap()
        );
        assert!(matches!(idx.stats(17), Err(GraphError::NodeNotFound(17))));
    }

    #[test]
    fn test_ranking() {
        let g = scenario(Directedness::Directed);
        let idx = DegreeIndex::new(&g);

        assert_eq!(
            vec![(1, 3), (0, 2), (2, 2)],
            idx.ranking(DegreeSelection::Total, 3)
        );
        assert_eq!(4, idx.ranking(DegreeSelection::Total, 10).len());
        assert!(idx.ranking(DegreeSelection::Total, 0).is_empty());
    }
}
