//! Sparse graph engine: loads a plain-text edge list into a compressed
//! adjacency store and answers degree and bounded-BFS queries over it.
//!
//! ```no_run
//! use neuronet::GraphEngine;
//!
//! let mut engine = GraphEngine::new();
//! let report = engine.load("edges.txt", true)?;
//! println!("{} nodes, {} edges", report.num_nodes, report.num_edges);
//! let critical = engine.degree_max_node(true, true)?;
//! let reach = engine.bfs(critical, 2)?;
//! # Ok::<(), neuronet::GraphError>(())
//! ```

pub mod analysis;
pub mod core;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod report;

pub use crate::core::graph::{DegreeSelection, Directedness, GraphBuilder, SparseGraph};
pub use crate::core::ids::{ExternalId, NodeId};
pub use engine::{GraphEngine, LoadOptions, LoadedGraph};
pub use error::{ErrorKind, GraphError, Result};
pub use ingest::edge_list::{Edge, EdgeListFormat, ParseOptions};
pub use report::LoadReport;
