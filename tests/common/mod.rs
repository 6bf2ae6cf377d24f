//! Common test utilities for affinity integration tests
//!
//! Provides a shared catalog schema and builders that load the same edge
//! set into both graph variants.

use affinity::{
    EdgeType, GraphBuilder, GraphMetadata, ImmutableGraph, MutableGraph, NodeId, NodeType,
};
use std::sync::Arc;

/// Install a test subscriber so traversal logs show up under --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A product/user schema with one weighted and one unweighted relation
pub fn catalog_schema() -> Arc<GraphMetadata> {
    GraphMetadata::builder()
        .with_node_type(NodeType::new("product"))
        .with_node_type(NodeType::new("user"))
        .with_edge_type(EdgeType::weighted("bought_together"))
        .with_edge_type(EdgeType::unweighted("viewed"))
        .build()
}

pub fn bought_together() -> EdgeType {
    EdgeType::weighted("bought_together")
}

pub fn product(key: u32) -> NodeId<u32> {
    NodeId::new(key, NodeType::new("product"))
}

/// Load weighted product edges into an immutable graph
pub fn immutable_catalog(edges: &[(u32, u32, f32)]) -> ImmutableGraph<u32> {
    let mut builder = GraphBuilder::new(catalog_schema());
    for &(from, to, weight) in edges {
        let from = builder.add_or_get_node(product(from)).unwrap();
        let to = builder.add_or_get_node(product(to)).unwrap();
        builder.add_edge(from, to, &bought_together(), weight).unwrap();
    }
    builder.build()
}

/// Load weighted product edges into a mutable graph
pub fn mutable_catalog(edges: &[(u32, u32, f32)]) -> MutableGraph<u32> {
    let graph = MutableGraph::new(catalog_schema());
    for &(from, to, weight) in edges {
        graph
            .add_edge(&product(from), &product(to), &bought_together(), weight)
            .unwrap();
    }
    graph
}
