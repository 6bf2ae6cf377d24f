//! Error types for graph construction and queries

use thiserror::Error;

/// Errors that can occur constructing or querying a graph
///
/// These are programmer errors, reported immediately and synchronously;
/// none of them is retriable. "No such edge" outcomes of `update_edge` and
/// `remove_edge` are not errors; those return `Ok(false)`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Node already registered: {0}")]
    DuplicateNode(String),

    #[error("Node index {index} out of range for {count} registered nodes")]
    NodeIndexOutOfRange { index: usize, count: usize },

    #[error("Node type not in graph metadata: {0}")]
    UnknownNodeType(String),

    #[error("Edge type not in graph metadata: {0}")]
    UnknownEdgeType(String),

    #[error("Edge already present: {start} -> {end} ({edge_type})")]
    DuplicateEdge {
        start: String,
        end: String,
        edge_type: String,
    },

    #[error("Targets and weights differ in length: {targets} vs {weights}")]
    LengthMismatch { targets: usize, weights: usize },

    #[error("Could not parse node key: {0}")]
    KeyParse(String),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
