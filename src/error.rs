//! Error types for the graph engine.

use std::path::PathBuf;

use thiserror::Error;

/// Broad failure class of a [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input file.
    Input,
    /// Query against a graph whose shape cannot answer it.
    Structural,
    /// Unknown node, invalid bound or selector.
    Query,
    /// Allocation failure or identifier space exhausted.
    Resource,
}

/// Error type for loading and querying graphs.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Input file does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Any other I/O failure while reading input.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the edge list is not two non-negative integers.
    #[error("parse error at line {line} ({reason}): {content:?}")]
    Parse {
        line: usize,
        content: String,
        reason: String,
    },

    /// The graph has no nodes.
    #[error("graph is empty")]
    EmptyGraph,

    /// The node never appeared in any edge.
    #[error("node not found: {0}")]
    NodeNotFound(u64),

    /// BFS depth bound below 1.
    #[error("invalid depth {0}: must be at least 1")]
    InvalidDepth(i64),

    /// Neither in- nor out-degree was selected.
    #[error("invalid degree selection: at least one of in/out must be counted")]
    InvalidDegreeSelection,

    /// Query issued before any successful load.
    #[error("no graph loaded")]
    NoGraphLoaded,

    /// The compressed arrays could not be allocated.
    #[error("out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },

    /// More distinct identifiers than the dense index can hold.
    #[error("node count exceeds the limit of {limit}")]
    TooManyNodes { limit: usize },
}

impl GraphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::FileNotFound(_) | GraphError::Io { .. } | GraphError::Parse { .. } => {
                ErrorKind::Input
            }
            GraphError::EmptyGraph => ErrorKind::Structural,
            GraphError::NodeNotFound(_)
            | GraphError::InvalidDepth(_)
            | GraphError::InvalidDegreeSelection
            | GraphError::NoGraphLoaded => ErrorKind::Query,
            GraphError::OutOfMemory { .. } | GraphError::TooManyNodes { .. } => {
                ErrorKind::Resource
            }
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            GraphError::FileNotFound(path)
        } else {
            GraphError::Io { path, source }
        }
    }
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
