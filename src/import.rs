//! Thin edge-record adapter over the graph construction APIs
//!
//! The boundary to external importers: callers parse whatever source
//! format they own (flat files, CSV dialects, feeds) into
//! [`EdgeRecord`]s and supply a key-parsing function; this module only
//! resolves records against a schema and drives the builders. No file or
//! wire format lives here.

use crate::graph::{
    EdgeType, GraphBuilder, GraphError, GraphKey, GraphMetadata, GraphResult, ImmutableGraph,
    MutableGraph, NodeId, NodeType,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One imported edge, prior to key resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Key of the node the edge leaves from
    pub start_key: String,
    /// Key of the node the edge points at
    pub end_key: String,
    /// Name of a registered edge type
    pub edge_type: String,
    /// Ranking weight (0.0 for unweighted types)
    pub weight: f32,
}

/// Bulk-load records into an [`ImmutableGraph`]
///
/// Every imported node gets the same `node_type`; keys are resolved via
/// `parse_key`. Errors on unregistered edge-type names and on key-parse
/// failures.
pub fn load_immutable<K, P, I>(
    metadata: Arc<GraphMetadata>,
    node_type: NodeType,
    records: I,
    parse_key: P,
) -> GraphResult<ImmutableGraph<K>>
where
    K: GraphKey,
    P: Fn(&str) -> GraphResult<K>,
    I: IntoIterator<Item = EdgeRecord>,
{
    let mut builder = GraphBuilder::new(metadata.clone());
    for record in records {
        let edge_type = resolve_edge_type(&metadata, &record.edge_type)?;
        let start = NodeId::new(parse_key(&record.start_key)?, node_type.clone());
        let end = NodeId::new(parse_key(&record.end_key)?, node_type.clone());
        let from = builder.add_or_get_node(start)?;
        let to = builder.add_or_get_node(end)?;
        builder.add_edge(from, to, &edge_type, record.weight)?;
    }
    Ok(builder.build())
}

/// Load records into a [`MutableGraph`]
///
/// Same resolution rules as [`load_immutable`]; a repeated
/// (start, end, type) record is a `DuplicateEdge` error, matching the
/// mutable variant's invariant.
pub fn load_mutable<K, P, I>(
    metadata: Arc<GraphMetadata>,
    node_type: NodeType,
    records: I,
    parse_key: P,
) -> GraphResult<MutableGraph<K>>
where
    K: GraphKey,
    P: Fn(&str) -> GraphResult<K>,
    I: IntoIterator<Item = EdgeRecord>,
{
    let graph = MutableGraph::new(metadata.clone());
    for record in records {
        let edge_type = resolve_edge_type(&metadata, &record.edge_type)?;
        let start = NodeId::new(parse_key(&record.start_key)?, node_type.clone());
        let end = NodeId::new(parse_key(&record.end_key)?, node_type.clone());
        graph.add_edge(&start, &end, &edge_type, record.weight)?;
    }
    Ok(graph)
}

fn resolve_edge_type(metadata: &GraphMetadata, name: &str) -> GraphResult<EdgeType> {
    metadata
        .edge_type_named(name)
        .cloned()
        .ok_or_else(|| GraphError::UnknownEdgeType(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeType, Graph, GraphError};

    fn metadata() -> Arc<GraphMetadata> {
        GraphMetadata::builder()
            .with_node_type(NodeType::new("product"))
            .with_edge_type(EdgeType::weighted("bought"))
            .build()
    }

    fn parse_u32(raw: &str) -> GraphResult<u32> {
        raw.parse()
            .map_err(|_| GraphError::KeyParse(raw.to_string()))
    }

    fn records() -> Vec<EdgeRecord> {
        vec![
            EdgeRecord {
                start_key: "1".into(),
                end_key: "2".into(),
                edge_type: "bought".into(),
                weight: 0.7,
            },
            EdgeRecord {
                start_key: "1".into(),
                end_key: "3".into(),
                edge_type: "bought".into(),
                weight: 0.3,
            },
        ]
    }

    #[test]
    fn loads_both_variants() {
        let immutable =
            load_immutable(metadata(), NodeType::new("product"), records(), parse_u32).unwrap();
        assert_eq!(immutable.node_count(), 3);
        assert_eq!(immutable.edge_count(), 2);

        let mutable =
            load_mutable(metadata(), NodeType::new("product"), records(), parse_u32).unwrap();
        assert_eq!(mutable.node_count(), 3);
        assert_eq!(mutable.edge_count(), 2);
    }

    #[test]
    fn unknown_edge_type_name_fails() {
        let mut bad = records();
        bad[0].edge_type = "likes".into();
        let result = load_immutable(metadata(), NodeType::new("product"), bad, parse_u32);
        assert!(matches!(result, Err(GraphError::UnknownEdgeType(_))));
    }

    #[test]
    fn key_parse_failure_fails() {
        let mut bad = records();
        bad[1].start_key = "not-a-number".into();
        let result = load_mutable(metadata(), NodeType::new("product"), bad, parse_u32);
        assert!(matches!(result, Err(GraphError::KeyParse(_))));
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = EdgeRecord {
            start_key: "a".into(),
            end_key: "b".into(),
            edge_type: "bought".into(),
            weight: 0.5,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: EdgeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
