//! Load-once, query-many session over a single graph.
//!
//! [`GraphEngine`] owns at most one loaded graph. A load builds the new store
//! completely before swapping it in, so a failed load leaves the previous
//! graph queryable. Readers that need to outlive a reload take a
//! [`GraphEngine::snapshot`] and keep querying the store they started with.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::analysis::bfs::{bfs, check_depth};
use crate::analysis::degree::DegreeIndex;
use crate::core::graph::{DegreeSelection, Directedness, GraphBuilder, SparseGraph};
use crate::core::ids::ExternalId;
use crate::error::{GraphError, Result};
use crate::ingest::edge_list::{Edge, EdgeListFormat, ParseOptions, ingest_edge_list};
use crate::report::LoadReport;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub directedness: Directedness,
    /// Inferred from the file extension when unset.
    pub format: Option<EdgeListFormat>,
    pub allow_comments: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            directedness: Directedness::Directed,
            format: None,
            allow_comments: true,
        }
    }
}

impl LoadOptions {
    pub fn directed(directed: bool) -> Self {
        Self {
            directedness: Directedness::from_flag(directed),
            ..Self::default()
        }
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            format: self.format,
            allow_comments: self.allow_comments,
        }
    }
}

/// A built graph together with the report of the load that produced it.
#[derive(Debug)]
pub struct LoadedGraph {
    graph: SparseGraph,
    report: LoadReport,
}

impl LoadedGraph {
    pub fn graph(&self) -> &SparseGraph {
        &self.graph
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn degree_max_node(&self, count_in: bool, count_out: bool) -> Result<ExternalId> {
        let selection = DegreeSelection::from_flags(count_in, count_out)?;
        DegreeIndex::new(&self.graph).node_of_max_degree(selection)
    }

    pub fn bfs(&self, start: ExternalId, max_depth: i64) -> Result<Vec<ExternalId>> {
        bfs(&self.graph, start, check_depth(max_depth)?)
    }

    pub fn neighbors(&self, node: ExternalId) -> Result<Vec<ExternalId>> {
        Ok(self.graph.neighbors(node)?.collect())
    }
}

#[derive(Debug, Default)]
pub struct GraphEngine {
    current: Option<Arc<LoadedGraph>>,
}

impl GraphEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: impl AsRef<Path>, directed: bool) -> Result<LoadReport> {
        self.load_with(path, &LoadOptions::directed(directed))
    }

    pub fn load_with(
        &mut self,
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<LoadReport> {
        let path = path.as_ref();
        let started = Instant::now();

        let built = GraphBuilder::new(options.directedness);
        let built = Self::ingest(path, options, built).and_then(GraphBuilder::freeze);
        match built {
            Ok(graph) => Ok(self.install(graph, started)),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    retained = self.current.is_some(),
                    "load failed"
                );
                Err(e)
            }
        }
    }

    fn ingest(
        path: &Path,
        options: &LoadOptions,
        mut builder: GraphBuilder,
    ) -> Result<GraphBuilder> {
        let stats = ingest_edge_list(path, &options.parse_options(), &mut builder)?;
        debug!(
            path = %path.display(),
            parsed = stats.parsed,
            skipped = stats.skipped,
            "edge list parsed"
        );
        Ok(builder)
    }

    /// Builds from in-memory pairs instead of a file.
    pub fn load_edges<I>(&mut self, edges: I, directedness: Directedness) -> Result<LoadReport>
    where
        I: IntoIterator<Item = Edge>,
    {
        let started = Instant::now();
        let graph = SparseGraph::build(edges, directedness)?;
        Ok(self.install(graph, started))
    }

    fn install(&mut self, graph: SparseGraph, started: Instant) -> LoadReport {
        let report = LoadReport::new(&graph, started.elapsed());
        info!(
            nodes = report.num_nodes,
            edges = report.num_edges,
            ms = report.seconds * 1000.0,
            mem_mb = report.mem_megabytes(),
            "graph loaded"
        );
        self.current = Some(Arc::new(LoadedGraph {
            graph,
            report: report.clone(),
        }));
        report
    }

    fn current(&self) -> Result<&LoadedGraph> {
        self.current.as_deref().ok_or(GraphError::NoGraphLoaded)
    }

    pub fn degree_max_node(&self, count_in: bool, count_out: bool) -> Result<ExternalId> {
        self.current()?.degree_max_node(count_in, count_out)
    }

    pub fn bfs(&self, start: ExternalId, max_depth: i64) -> Result<Vec<ExternalId>> {
        self.current()?.bfs(start, max_depth)
    }

    pub fn neighbors(&self, node: ExternalId) -> Result<Vec<ExternalId>> {
        self.current()?.neighbors(node)
    }

    /// Report of the most recent successful load, `None` if nothing is loaded.
    pub fn last_report(&self) -> Option<&LoadReport> {
        self.current.as_deref().map(LoadedGraph::report)
    }

    pub fn snapshot(&self) -> Option<Arc<LoadedGraph>> {
        self.current.clone()
    }

    /// Drops the engine's reference to the current graph.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
