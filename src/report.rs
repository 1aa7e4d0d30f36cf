use std::fmt;
use std::time::Duration;

use crate::core::graph::{Directedness, SparseGraph};
use crate::core::memory::{MemoryFootprint, megabytes};

/// Summary of one completed load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub seconds: f64,
    pub mem_bytes_estimate: usize,
    pub directedness: Directedness,
    pub footprint: MemoryFootprint,
}

impl LoadReport {
    pub fn new(graph: &SparseGraph, elapsed: Duration) -> Self {
        let footprint = graph.memory_footprint();
        Self {
            num_nodes: graph.node_count(),
            num_edges: graph.edge_count(),
            seconds: elapsed.as_secs_f64(),
            mem_bytes_estimate: footprint.total(),
            directedness: graph.directedness(),
            footprint,
        }
    }

    pub fn mem_megabytes(&self) -> f64 {
        megabytes(self.mem_bytes_estimate)
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mode:      {:?}", self.directedness)?;
        writeln!(f, "Nodes:     {}", self.num_nodes)?;
        writeln!(f, "Edges:     {}", self.num_edges)?;
        writeln!(f, "Load time: {:.3}s", self.seconds)?;
        write!(f, "Memory:    {:.3} MB", self.mem_megabytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_graph() {
        let edges = [(0, 1), (1, 2), (2, 0), (1, 3)];
        let g = SparseGraph::build(edges, Directedness::Directed).unwrap();
        let report = LoadReport::new(&g, Duration::from_millis(1500));

        assert_eq!(4, report.num_nodes);
        assert_eq!(4, report.num_edges);
        assert_relative_eq!(1.5, report.seconds);
        assert_eq!(g.memory_bytes(), report.mem_bytes_estimate);
        assert_eq!(report.footprint.total(), report.mem_bytes_estimate);
    }

    #[test]
    fn test_display() {
        let g = SparseGraph::build([(0, 1)], Directedness::Undirected).unwrap();
        let text = LoadReport::new(&g, Duration::ZERO).to_string();

        assert!(text.contains("Nodes:     2"));
        assert!(text.contains("Edges:     1"));
        assert!(text.contains("Undirected"));
    }
}
