//! Node identity: generic keys paired with a node type

use super::meta::NodeType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Capability required of a node key
///
/// Any hashable, comparable, cloneable value qualifies: plain integers,
/// strings, or memory-compact flyweight identifier types supplied by the
/// caller. The graph never inspects keys beyond equality, hashing, and
/// ordering, so identifier-compression schemes stay fully decoupled from
/// graph internals.
pub trait GraphKey: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync + 'static {}

impl<T> GraphKey for T where T: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync + 'static {}

/// External handle for a node: an opaque key paired with its node type
///
/// Equality and hashing cover both fields, so the same key under two
/// different node types names two distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId<K> {
    key: K,
    node_type: NodeType,
}

impl<K: GraphKey> NodeId<K> {
    /// Create a node id from a key and its type
    pub fn new(key: K, node_type: NodeType) -> Self {
        Self { key, node_type }
    }

    /// The opaque key
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The node type
    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }
}

impl<K: fmt::Display> fmt::Display for NodeId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node_type, self.key)
    }
}
