//! Affinity: In-Memory Recommendation Graph Engine
//!
//! A typed, weighted directed graph store with a weight-ranked, bounded
//! traversal query engine, built for recommendation workloads where
//! nearby, high-weight relations dominate relevance.
//!
//! # Core Concepts
//!
//! - **Nodes**: entities (products, users, sessions) identified by an
//!   opaque key plus a [`NodeType`]
//! - **Edges**: typed, optionally weighted directed relations
//! - **Two storage variants**: a bulk-built, read-only [`ImmutableGraph`]
//!   and an online-updatable [`MutableGraph`], sharing one traversal
//!   algorithm through the [`Graph`] trait
//! - **Cursors**: lazy, pull-based iteration over ranked breadth-first
//!   traversal results
//!
//! # Example
//!
//! ```
//! use affinity::{EdgeType, Graph, GraphMetadata, MutableGraph, NodeId, NodeType};
//!
//! let metadata = GraphMetadata::builder()
//!     .with_node_type(NodeType::new("product"))
//!     .with_edge_type(EdgeType::weighted("bought_together"))
//!     .build();
//!
//! let graph: MutableGraph<u64> = MutableGraph::new(metadata);
//! let bought = EdgeType::weighted("bought_together");
//! let product = |key| NodeId::new(key, NodeType::new("product"));
//!
//! graph.add_edge(&product(1), &product(2), &bought, 0.7).unwrap();
//! graph.add_edge(&product(1), &product(3), &bought, 0.3).unwrap();
//!
//! let traverser = graph
//!     .prepare_traversal(product(1), bought)
//!     .max_depth(1)
//!     .build()
//!     .unwrap();
//! let recommended: Vec<u64> = traverser
//!     .traverse()
//!     .map(|edge| *edge.end.key())
//!     .collect();
//! assert_eq!(recommended, vec![2, 3]);
//! ```

mod graph;
pub mod import;
pub mod query;

pub use graph::{
    EdgeList, EdgeSlot, EdgeType, Graph, GraphBuilder, GraphEdge, GraphError, GraphId, GraphKey,
    GraphMetadata, GraphResult, ImmutableGraph, MetadataBuilder, MutableGraph, NodeId, NodeType,
    TraversalStats, TraversalStatsSnapshot,
};
pub use query::{EdgeCursor, EdgeFilter, TraversalBuilder, Traverser};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
