//! Bulk-built, read-only graph with compiled per-type adjacency arrays

use super::edge::{EdgeList, EdgeSlot, GraphEdge};
use super::error::{GraphError, GraphResult};
use super::meta::{EdgeType, GraphMetadata};
use super::node::{GraphKey, NodeId};
use super::stats::TraversalStats;
use super::traits::{Graph, GraphId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// An edge staged in the builder, prior to compilation
#[derive(Debug, Clone, Copy)]
struct StagedEdge {
    from: usize,
    to: usize,
    weight: f32,
}

/// Accumulates nodes and edges, then compiles an [`ImmutableGraph`]
///
/// `build` consumes the builder, so reuse after build is a compile-time
/// error. Validation is eager: `add_node` rejects re-registration,
/// `add_edge` rejects out-of-range indices and edge types outside the
/// schema, which leaves nothing for `build` itself to fail on.
#[derive(Debug)]
pub struct GraphBuilder<K: GraphKey> {
    metadata: Arc<GraphMetadata>,
    nodes: Vec<NodeId<K>>,
    index: HashMap<NodeId<K>, usize>,
    staged: Vec<Vec<StagedEdge>>,
}

impl<K: GraphKey> GraphBuilder<K> {
    /// Create a builder for the given schema
    pub fn new(metadata: Arc<GraphMetadata>) -> Self {
        let staged = vec![Vec::new(); metadata.edge_type_count()];
        Self {
            metadata,
            nodes: Vec::new(),
            index: HashMap::new(),
            staged,
        }
    }

    /// Register a node, returning its internal index
    ///
    /// Errors if the node is already registered or its type is outside the
    /// schema.
    pub fn add_node(&mut self, id: NodeId<K>) -> GraphResult<usize> {
        if !self.metadata.has_node_type(id.node_type()) {
            return Err(GraphError::UnknownNodeType(id.node_type().to_string()));
        }
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateNode(format!("{:?}", id)));
        }
        Ok(self.insert_node(id))
    }

    /// Register a node if unseen, returning its index either way
    pub fn add_or_get_node(&mut self, id: NodeId<K>) -> GraphResult<usize> {
        if !self.metadata.has_node_type(id.node_type()) {
            return Err(GraphError::UnknownNodeType(id.node_type().to_string()));
        }
        if let Some(&existing) = self.index.get(&id) {
            return Ok(existing);
        }
        Ok(self.insert_node(id))
    }

    /// Stage a directed edge between two registered node indices
    pub fn add_edge(
        &mut self,
        from: usize,
        to: usize,
        edge_type: &EdgeType,
        weight: f32,
    ) -> GraphResult<()> {
        let ordinal = self
            .metadata
            .edge_type_ordinal(edge_type)
            .ok_or_else(|| GraphError::UnknownEdgeType(edge_type.to_string()))?;
        self.check_index(from)?;
        self.check_index(to)?;
        self.staged[ordinal].push(StagedEdge { from, to, weight });
        Ok(())
    }

    /// Number of nodes registered so far
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges staged so far
    pub fn edge_count(&self) -> usize {
        self.staged.iter().map(Vec::len).sum()
    }

    /// Compile the staged edges into a read-only graph
    ///
    /// All ranking cost is paid here: per node and edge type, outgoing
    /// edges land contiguously in descending-weight order (stable, so
    /// insertion order breaks ties), and traversal never sorts again.
    pub fn build(self) -> ImmutableGraph<K> {
        let node_count = self.nodes.len();
        let mut edge_count = 0;

        let adjacency = self
            .staged
            .into_iter()
            .map(|mut staged| {
                edge_count += staged.len();
                // Stable sort: grouped by source, descending weight within
                // each group, insertion order preserved among equal weights.
                staged.sort_by(|a, b| {
                    a.from
                        .cmp(&b.from)
                        .then_with(|| b.weight.total_cmp(&a.weight))
                });

                let mut offsets = vec![0usize; node_count + 1];
                for edge in &staged {
                    offsets[edge.from + 1] += 1;
                }
                for i in 0..node_count {
                    offsets[i + 1] += offsets[i];
                }
                let slots: Arc<[EdgeSlot]> = staged
                    .into_iter()
                    .map(|e| EdgeSlot {
                        target: e.to,
                        weight: e.weight,
                    })
                    .collect::<Vec<_>>()
                    .into();
                CompiledAdjacency { offsets, slots }
            })
            .collect();

        let id = GraphId::new();
        debug!(
            graph = %id,
            nodes = node_count,
            edges = edge_count,
            "compiled immutable graph"
        );

        ImmutableGraph {
            id,
            metadata: self.metadata,
            nodes: self.nodes,
            index: self.index,
            adjacency,
            edge_count,
            created_at: Utc::now(),
            stats: TraversalStats::default(),
        }
    }

    fn insert_node(&mut self, id: NodeId<K>) -> usize {
        let index = self.nodes.len();
        self.index.insert(id.clone(), index);
        self.nodes.push(id);
        index
    }

    fn check_index(&self, index: usize) -> GraphResult<()> {
        if index >= self.nodes.len() {
            return Err(GraphError::NodeIndexOutOfRange {
                index,
                count: self.nodes.len(),
            });
        }
        Ok(())
    }
}

/// Per-edge-type compiled adjacency: one shared slot array plus per-node
/// offsets into it
#[derive(Debug)]
struct CompiledAdjacency {
    offsets: Vec<usize>,
    slots: Arc<[EdgeSlot]>,
}

/// Append-only graph variant, optimized for read-mostly workloads
///
/// Produced once by [`GraphBuilder::build`]; no mutation is possible
/// afterwards, so unlimited concurrent readers run with zero
/// synchronization overhead.
#[derive(Debug)]
pub struct ImmutableGraph<K: GraphKey> {
    id: GraphId,
    metadata: Arc<GraphMetadata>,
    nodes: Vec<NodeId<K>>,
    index: HashMap<NodeId<K>, usize>,
    adjacency: Vec<CompiledAdjacency>,
    edge_count: usize,
    created_at: DateTime<Utc>,
    stats: TraversalStats,
}

impl<K: GraphKey> ImmutableGraph<K> {
    /// Instance identifier, for log correlation
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// When this graph was built
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl<K: GraphKey> Graph for ImmutableGraph<K> {
    type Key = K;

    fn metadata(&self) -> &Arc<GraphMetadata> {
        &self.metadata
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn node_index(&self, id: &NodeId<K>) -> Option<usize> {
        self.index.get(id).copied()
    }

    fn node_at(&self, index: usize) -> Option<NodeId<K>> {
        self.nodes.get(index).cloned()
    }

    fn ranked_edges(&self, node: usize, edge_type_ordinal: usize) -> EdgeList {
        let Some(adjacency) = self.adjacency.get(edge_type_ordinal) else {
            return EdgeList::empty();
        };
        if node + 1 >= adjacency.offsets.len() {
            return EdgeList::empty();
        }
        let range = adjacency.offsets[node]..adjacency.offsets[node + 1];
        EdgeList::new(adjacency.slots.clone(), range)
    }

    fn for_each_node<F: FnMut(&NodeId<K>)>(&self, mut f: F) {
        for id in &self.nodes {
            f(id);
        }
    }

    fn for_each_edge<F: FnMut(GraphEdge<K>)>(&self, mut f: F) {
        for (ordinal, adjacency) in self.adjacency.iter().enumerate() {
            let edge_type = &self.metadata.edge_types()[ordinal];
            for from in 0..self.nodes.len() {
                for slot in &adjacency.slots[adjacency.offsets[from]..adjacency.offsets[from + 1]] {
                    f(GraphEdge::new(
                        self.nodes[from].clone(),
                        self.nodes[slot.target].clone(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::meta::NodeType;

    fn metadata() -> Arc<GraphMetadata> {
        GraphMetadata::builder()
            .with_node_type(NodeType::new("product"))
            .with_edge_type(EdgeType::weighted("bought"))
            .with_edge_type(EdgeType::unweighted("viewed"))
            .build()
    }

    fn product(key: u32) -> NodeId<u32> {
        NodeId::new(key, NodeType::new("product"))
    }

    #[test]
    fn add_node_rejects_duplicates() {
        let mut builder = GraphBuilder::new(metadata());
        assert_eq!(builder.add_node(product(1)).ok(), Some(0));
        assert!(matches!(
            builder.add_node(product(1)),
            Err(GraphError::DuplicateNode(_))
        ));
    }

    #[test]
    fn add_or_get_node_is_idempotent() {
        let mut builder = GraphBuilder::new(metadata());
        let first = builder.add_or_get_node(product(1)).ok();
        let again = builder.add_or_get_node(product(1)).ok();
        assert_eq!(first, Some(0));
        assert_eq!(again, Some(0));
        assert_eq!(builder.node_count(), 1);
    }

    #[test]
    fn node_type_outside_schema_rejected() {
        let mut builder: GraphBuilder<u32> = GraphBuilder::new(metadata());
        let stray = NodeId::new(1, NodeType::new("warehouse"));
        assert!(matches!(
            builder.add_node(stray),
            Err(GraphError::UnknownNodeType(_))
        ));
    }

    #[test]
    fn add_edge_validates_indices_and_type() {
        let mut builder = GraphBuilder::new(metadata());
        let a = builder.add_node(product(1)).ok();
        assert_eq!(a, Some(0));

        assert!(matches!(
            builder.add_edge(0, 7, &EdgeType::weighted("bought"), 1.0),
            Err(GraphError::NodeIndexOutOfRange { index: 7, count: 1 })
        ));
        assert!(matches!(
            builder.add_edge(0, 0, &EdgeType::weighted("likes"), 1.0),
            Err(GraphError::UnknownEdgeType(_))
        ));
        // Weighted flag is part of the type's identity
        assert!(matches!(
            builder.add_edge(0, 0, &EdgeType::unweighted("bought"), 0.0),
            Err(GraphError::UnknownEdgeType(_))
        ));
    }

    #[test]
    fn build_sorts_adjacency_by_descending_weight() {
        let bought = EdgeType::weighted("bought");
        let mut builder = GraphBuilder::new(metadata());
        let a = builder.add_node(product(1)).ok();
        assert_eq!(a, Some(0));
        for key in 2..=4 {
            builder.add_node(product(key)).ok();
        }
        builder.add_edge(0, 1, &bought, 0.2).ok();
        builder.add_edge(0, 2, &bought, 0.9).ok();
        builder.add_edge(0, 3, &bought, 0.5).ok();

        let graph = builder.build();
        let list = graph.ranked_edges(0, 0);
        let order: Vec<usize> = list.iter().map(|s| s.target).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn equal_weights_keep_insertion_order() {
        let bought = EdgeType::weighted("bought");
        let mut builder = GraphBuilder::new(metadata());
        for key in 1..=4 {
            builder.add_node(product(key)).ok();
        }
        builder.add_edge(0, 3, &bought, 0.5).ok();
        builder.add_edge(0, 1, &bought, 0.5).ok();
        builder.add_edge(0, 2, &bought, 0.5).ok();

        let graph = builder.build();
        let order: Vec<usize> = graph.ranked_edges(0, 0).iter().map(|s| s.target).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn enumeration_matches_inserted_content() {
        let bought = EdgeType::weighted("bought");
        let viewed = EdgeType::unweighted("viewed");
        let mut builder = GraphBuilder::new(metadata());
        for key in 1..=3 {
            builder.add_node(product(key)).ok();
        }
        builder.add_edge(0, 1, &bought, 0.7).ok();
        builder.add_edge(1, 2, &viewed, 0.0).ok();

        let graph = builder.build();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let mut nodes = Vec::new();
        graph.for_each_node(|n| nodes.push(n.clone()));
        assert_eq!(nodes, vec![product(1), product(2), product(3)]);

        let mut edges = Vec::new();
        graph.for_each_edge(|e| edges.push(e));
        assert_eq!(edges.len(), 2);
        assert!(edges.contains(&GraphEdge::new(product(1), product(2), bought, 0.7)));
        assert!(edges.contains(&GraphEdge::new(product(2), product(3), viewed, 0.0)));
    }

    #[test]
    fn ranked_edges_out_of_range_is_empty() {
        let graph = GraphBuilder::<u32>::new(metadata()).build();
        assert!(graph.ranked_edges(0, 0).is_empty());
        assert!(graph.ranked_edges(99, 99).is_empty());
    }
}
