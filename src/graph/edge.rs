//! Edge representation and ranked adjacency snapshots

use super::meta::EdgeType;
use super::node::{GraphKey, NodeId};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// A directed, typed, weighted edge between two nodes
///
/// For edge types with `is_weighted() == false` the weight is
/// conventionally 0.0 and carries no ranking meaning. Equality is
/// structural over all four fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge<K> {
    /// Node the edge leaves from
    pub start: NodeId<K>,
    /// Node the edge points at
    pub end: NodeId<K>,
    /// Relation kind
    pub edge_type: EdgeType,
    /// Ranking weight
    pub weight: f32,
}

impl<K: GraphKey> GraphEdge<K> {
    /// Create a new edge
    pub fn new(start: NodeId<K>, end: NodeId<K>, edge_type: EdgeType, weight: f32) -> Self {
        Self {
            start,
            end,
            edge_type,
            weight,
        }
    }
}

/// One outgoing edge as stored in an adjacency list: target index + weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSlot {
    /// Internal index of the target node
    pub target: usize,
    /// Ranking weight
    pub weight: f32,
}

/// A consistent, descending-weight snapshot of one (node, edge type)
/// adjacency list
///
/// Both graph variants hand these to the traversal engine: the immutable
/// variant as a range over its per-type compiled slot array, the mutable
/// variant as the whole of one copy-on-write list. Either way the snapshot
/// is plain shared data. A suspended cursor can hold it across pulls
/// without keeping any lock, and concurrent mutation can never change what
/// it sees.
#[derive(Debug, Clone)]
pub struct EdgeList {
    slots: Arc<[EdgeSlot]>,
    range: Range<usize>,
}

impl EdgeList {
    pub(crate) fn new(slots: Arc<[EdgeSlot]>, range: Range<usize>) -> Self {
        Self { slots, range }
    }

    pub(crate) fn empty() -> Self {
        Self {
            slots: Arc::from(Vec::new()),
            range: 0..0,
        }
    }

    /// Number of edges in the snapshot
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether the snapshot holds no edges
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// The edge at position `i`, highest-ranked first
    pub fn get(&self, i: usize) -> Option<EdgeSlot> {
        self.as_slice().get(i).copied()
    }

    /// The snapshot as a slice, highest-ranked first
    pub fn as_slice(&self) -> &[EdgeSlot] {
        &self.slots[self.range.clone()]
    }

    /// Iterate the snapshot, highest-ranked first
    pub fn iter(&self) -> impl Iterator<Item = EdgeSlot> + '_ {
        self.as_slice().iter().copied()
    }
}
