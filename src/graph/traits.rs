//! The adjacency-access contract shared by both graph variants

use super::edge::{EdgeList, GraphEdge};
use super::meta::{EdgeType, GraphMetadata};
use super::node::{GraphKey, NodeId};
use super::stats::TraversalStats;
use crate::query::TraversalBuilder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a graph instance
///
/// Used to correlate log events; never part of node or edge identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(Uuid);

impl GraphId {
    /// Create a new random GraphId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ranked adjacency lookup: the capability the traversal engine consumes
///
/// Both storage variants implement this, so the bounded ranked BFS is
/// written once. The contract every implementor upholds:
///
/// - node indices are dense, zero-based, and stable for the instance
///   lifetime;
/// - [`Graph::ranked_edges`] returns a consistent snapshot of one
///   (node, edge type) list, ordered by descending weight with
///   insertion-stable ties;
/// - [`Graph::for_each_node`] / [`Graph::for_each_edge`] visit each node
///   and edge exactly once.
pub trait Graph {
    /// Key type of this graph's node ids
    type Key: GraphKey;

    /// The schema this graph was built against
    fn metadata(&self) -> &Arc<GraphMetadata>;

    /// Number of registered nodes
    fn node_count(&self) -> usize;

    /// Number of stored edges
    fn edge_count(&self) -> usize;

    /// Internal index of a node, if registered
    fn node_index(&self, id: &NodeId<Self::Key>) -> Option<usize>;

    /// Node id at an internal index, if in range
    fn node_at(&self, index: usize) -> Option<NodeId<Self::Key>>;

    /// Descending-weight snapshot of one (node, edge type ordinal) list
    ///
    /// Out-of-range indices and ordinals yield an empty list.
    fn ranked_edges(&self, node: usize, edge_type_ordinal: usize) -> EdgeList;

    /// Visit every node exactly once
    fn for_each_node<F: FnMut(&NodeId<Self::Key>)>(&self, f: F);

    /// Visit every edge exactly once
    fn for_each_edge<F: FnMut(GraphEdge<Self::Key>)>(&self, f: F);

    /// Aggregate traversal statistics for this instance
    fn stats(&self) -> &TraversalStats;

    /// Start configuring a traversal from `start` along `edge_type`
    fn prepare_traversal(
        &self,
        start: NodeId<Self::Key>,
        edge_type: EdgeType,
    ) -> TraversalBuilder<'_, Self>
    where
        Self: Sized,
    {
        TraversalBuilder::new(self, start, edge_type)
    }
}
