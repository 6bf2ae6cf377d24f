//! Mutable graph variant with per-(node, type) copy-on-write edge lists

use super::edge::{EdgeList, EdgeSlot, GraphEdge};
use super::error::{GraphError, GraphResult};
use super::meta::{EdgeType, GraphMetadata};
use super::node::{GraphKey, NodeId};
use super::stats::TraversalStats;
use super::traits::{Graph, GraphId};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Graph variant supporting online edge updates under concurrent access
///
/// Adjacency is one `DashMap` per edge type, keyed by source node index.
/// Each (node, type) list is an immutable `Arc<[EdgeSlot]>` replaced
/// wholesale under the map's shard lock: readers clone the `Arc` and
/// iterate a consistent snapshot, so a half-updated list is
/// unrepresentable and `set_edges` replacement is atomic. Mutations to
/// lists a traversal has not yet snapshotted may or may not be observed
/// mid-run.
#[derive(Debug)]
pub struct MutableGraph<K: GraphKey> {
    id: GraphId,
    metadata: Arc<GraphMetadata>,
    index: DashMap<NodeId<K>, usize>,
    nodes: DashMap<usize, NodeId<K>>,
    next_index: AtomicUsize,
    adjacency: Vec<DashMap<usize, Arc<[EdgeSlot]>>>,
    edge_count: AtomicUsize,
    created_at: DateTime<Utc>,
    stats: TraversalStats,
}

impl<K: GraphKey> MutableGraph<K> {
    /// Create an empty graph for the given schema
    pub fn new(metadata: Arc<GraphMetadata>) -> Self {
        let adjacency = (0..metadata.edge_type_count())
            .map(|_| DashMap::new())
            .collect();
        let id = GraphId::new();
        debug!(graph = %id, "created mutable graph");
        Self {
            id,
            metadata,
            index: DashMap::new(),
            nodes: DashMap::new(),
            next_index: AtomicUsize::new(0),
            adjacency,
            edge_count: AtomicUsize::new(0),
            created_at: Utc::now(),
            stats: TraversalStats::default(),
        }
    }

    /// Instance identifier, for log correlation
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// When this graph was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Register a node, allocating a dense index on first sight
    ///
    /// Idempotent; edge operations call this implicitly for every node id
    /// they reference.
    pub fn add_node(&self, id: &NodeId<K>) -> GraphResult<usize> {
        if !self.metadata.has_node_type(id.node_type()) {
            return Err(GraphError::UnknownNodeType(id.node_type().to_string()));
        }
        if let Some(existing) = self.index.get(id) {
            return Ok(*existing);
        }
        let index = *self.index.entry(id.clone()).or_insert_with(|| {
            let index = self.next_index.fetch_add(1, Ordering::Relaxed);
            self.nodes.insert(index, id.clone());
            index
        });
        Ok(index)
    }

    /// Insert a directed edge
    ///
    /// Unseen node ids are registered on the fly. A second edge for the
    /// same (from, to, type) triple is an error; use [`Self::update_edge`]
    /// or [`Self::set_edges`] to change an existing edge.
    pub fn add_edge(
        &self,
        from: &NodeId<K>,
        to: &NodeId<K>,
        edge_type: &EdgeType,
        weight: f32,
    ) -> GraphResult<()> {
        let ordinal = self.edge_type_ordinal(edge_type)?;
        let from_index = self.add_node(from)?;
        let to_index = self.add_node(to)?;

        let mut entry = self.adjacency[ordinal]
            .entry(from_index)
            .or_insert_with(|| Arc::from(Vec::new()));
        if entry.value().iter().any(|s| s.target == to_index) {
            return Err(GraphError::DuplicateEdge {
                start: format!("{:?}", from),
                end: format!("{:?}", to),
                edge_type: edge_type.to_string(),
            });
        }
        let next = insert_ranked(entry.value(), to_index, weight);
        *entry.value_mut() = next;
        drop(entry);

        self.edge_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Change the weight of an existing edge, re-ranking its list
    ///
    /// Returns `false` if the edge does not exist; the graph is unchanged
    /// in that case.
    pub fn update_edge(
        &self,
        from: &NodeId<K>,
        to: &NodeId<K>,
        edge_type: &EdgeType,
        new_weight: f32,
    ) -> GraphResult<bool> {
        let ordinal = self.edge_type_ordinal(edge_type)?;
        let (Some(from_index), Some(to_index)) = (self.node_index(from), self.node_index(to))
        else {
            return Ok(false);
        };

        let Some(mut entry) = self.adjacency[ordinal].get_mut(&from_index) else {
            return Ok(false);
        };
        if !entry.value().iter().any(|s| s.target == to_index) {
            return Ok(false);
        }
        let remaining = remove_target(entry.value(), to_index);
        *entry.value_mut() = insert_ranked(&remaining, to_index, new_weight);
        Ok(true)
    }

    /// Remove an edge
    ///
    /// Returns `false` if the edge does not exist; the graph is unchanged
    /// in that case.
    pub fn remove_edge(
        &self,
        from: &NodeId<K>,
        to: &NodeId<K>,
        edge_type: &EdgeType,
    ) -> GraphResult<bool> {
        let ordinal = self.edge_type_ordinal(edge_type)?;
        let (Some(from_index), Some(to_index)) = (self.node_index(from), self.node_index(to))
        else {
            return Ok(false);
        };

        {
            let Some(mut entry) = self.adjacency[ordinal].get_mut(&from_index) else {
                return Ok(false);
            };
            if !entry.value().iter().any(|s| s.target == to_index) {
                return Ok(false);
            }
            let remaining = remove_target(entry.value(), to_index);
            *entry.value_mut() = remaining.into();
        }

        self.edge_count.fetch_sub(1, Ordering::Relaxed);
        Ok(true)
    }

    /// Atomically replace the entire (from, type) outgoing edge set
    ///
    /// A concurrent reader sees either the old full list or the new full
    /// list, never a partial mix. Errors if the two slices differ in
    /// length or the same target appears twice.
    pub fn set_edges(
        &self,
        from: &NodeId<K>,
        edge_type: &EdgeType,
        targets: &[NodeId<K>],
        weights: &[f32],
    ) -> GraphResult<()> {
        let ordinal = self.edge_type_ordinal(edge_type)?;
        if targets.len() != weights.len() {
            return Err(GraphError::LengthMismatch {
                targets: targets.len(),
                weights: weights.len(),
            });
        }
        let from_index = self.add_node(from)?;

        let mut seen = HashSet::new();
        let mut slots = Vec::with_capacity(targets.len());
        for (target, &weight) in targets.iter().zip(weights) {
            let target_index = self.add_node(target)?;
            if !seen.insert(target_index) {
                return Err(GraphError::DuplicateEdge {
                    start: format!("{:?}", from),
                    end: format!("{:?}", target),
                    edge_type: edge_type.to_string(),
                });
            }
            slots.push(EdgeSlot {
                target: target_index,
                weight,
            });
        }
        // Stable sort keeps caller order among equal weights.
        slots.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        let new_len = slots.len();
        let old = self.adjacency[ordinal].insert(from_index, slots.into());
        let old_len = old.map_or(0, |list| list.len());

        self.edge_count.fetch_add(new_len, Ordering::Relaxed);
        self.edge_count.fetch_sub(old_len, Ordering::Relaxed);
        Ok(())
    }

    fn edge_type_ordinal(&self, edge_type: &EdgeType) -> GraphResult<usize> {
        self.metadata
            .edge_type_ordinal(edge_type)
            .ok_or_else(|| GraphError::UnknownEdgeType(edge_type.to_string()))
    }
}

impl<K: GraphKey> Graph for MutableGraph<K> {
    type Key = K;

    fn metadata(&self) -> &Arc<GraphMetadata> {
        &self.metadata
    }

    fn node_count(&self) -> usize {
        self.index.len()
    }

    fn edge_count(&self) -> usize {
        self.edge_count.load(Ordering::Relaxed)
    }

    fn node_index(&self, id: &NodeId<K>) -> Option<usize> {
        self.index.get(id).map(|entry| *entry.value())
    }

    fn node_at(&self, index: usize) -> Option<NodeId<K>> {
        self.nodes.get(&index).map(|entry| entry.value().clone())
    }

    fn ranked_edges(&self, node: usize, edge_type_ordinal: usize) -> EdgeList {
        let Some(map) = self.adjacency.get(edge_type_ordinal) else {
            return EdgeList::empty();
        };
        match map.get(&node) {
            Some(entry) => {
                let slots = entry.value().clone();
                let len = slots.len();
                EdgeList::new(slots, 0..len)
            }
            None => EdgeList::empty(),
        }
    }

    fn for_each_node<F: FnMut(&NodeId<K>)>(&self, mut f: F) {
        for entry in self.nodes.iter() {
            f(entry.value());
        }
    }

    fn for_each_edge<F: FnMut(GraphEdge<K>)>(&self, mut f: F) {
        for (ordinal, map) in self.adjacency.iter().enumerate() {
            let edge_type = &self.metadata.edge_types()[ordinal];
            for entry in map.iter() {
                let Some(start) = self.node_at(*entry.key()) else {
                    continue;
                };
                for slot in entry.value().iter() {
                    let Some(end) = self.node_at(slot.target) else {
                        continue;
                    };
                    f(GraphEdge::new(
                        start.clone(),
                        end,
                        edge_type.clone(),
                        slot.weight,
                    ));
                }
            }
        }
    }

    fn stats(&self) -> &TraversalStats {
        &self.stats
    }
}

/// Build a new list with `target` inserted in descending-weight position,
/// after any equal weights already present
fn insert_ranked(slots: &[EdgeSlot], target: usize, weight: f32) -> Arc<[EdgeSlot]> {
    let position = slots
        .iter()
        .position(|s| s.weight < weight)
        .unwrap_or(slots.len());
    let mut next = Vec::with_capacity(slots.len() + 1);
    next.extend_from_slice(&slots[..position]);
    next.push(EdgeSlot { target, weight });
    next.extend_from_slice(&slots[position..]);
    next.into()
}

/// Build a new list with `target` removed
fn remove_target(slots: &[EdgeSlot], target: usize) -> Vec<EdgeSlot> {
    slots.iter().filter(|s| s.target != target).copied().collect()
}
