//! Node/edge type registries and graph schema metadata

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Category tag for a kind of graph entity (e.g. "product", "user", "session")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeType(String);

impl NodeType {
    /// Create a node type with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the type name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category tag for a relation kind (e.g. "bought", "people_who_bought")
///
/// Carries a fixed weighted/unweighted attribute. Two edge types are equal
/// only if both the name and the attribute match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeType {
    name: String,
    weighted: bool,
}

impl EdgeType {
    /// Create a weighted edge type
    pub fn weighted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weighted: true,
        }
    }

    /// Create an unweighted edge type
    ///
    /// Edges of an unweighted type conventionally carry weight 0.0; the
    /// value has no ranking meaning.
    pub fn unweighted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weighted: false,
        }
    }

    /// Get the type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether edges of this type carry a meaningful weight
    pub fn is_weighted(&self) -> bool {
        self.weighted
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The closed set of valid node and edge types for a graph instance
///
/// One instance is shared (via `Arc`) by every graph built with the same
/// schema. Construction inputs are validated against it, and the registered
/// type sets can be enumerated for export tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetadata {
    node_types: Vec<NodeType>,
    edge_types: Vec<EdgeType>,
}

impl GraphMetadata {
    /// Start building a metadata instance
    pub fn builder() -> MetadataBuilder {
        MetadataBuilder::default()
    }

    /// Check whether a node type belongs to this schema
    pub fn has_node_type(&self, node_type: &NodeType) -> bool {
        self.node_types.contains(node_type)
    }

    /// Check whether an edge type belongs to this schema
    ///
    /// Both the name and the weighted attribute must match.
    pub fn has_edge_type(&self, edge_type: &EdgeType) -> bool {
        self.edge_types.contains(edge_type)
    }

    /// Look up a registered edge type by name
    pub fn edge_type_named(&self, name: &str) -> Option<&EdgeType> {
        self.edge_types.iter().find(|t| t.name() == name)
    }

    /// All registered node types
    pub fn node_types(&self) -> &[NodeType] {
        &self.node_types
    }

    /// All registered edge types
    pub fn edge_types(&self) -> &[EdgeType] {
        &self.edge_types
    }

    /// Dense ordinal of an edge type within this schema
    ///
    /// Ordinals index the per-type adjacency structures of both graph
    /// variants; they are internal and not stable across schemas.
    pub(crate) fn edge_type_ordinal(&self, edge_type: &EdgeType) -> Option<usize> {
        self.edge_types.iter().position(|t| t == edge_type)
    }

    pub(crate) fn edge_type_count(&self) -> usize {
        self.edge_types.len()
    }
}

/// Builder for [`GraphMetadata`]
#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    node_types: Vec<NodeType>,
    edge_types: Vec<EdgeType>,
}

impl MetadataBuilder {
    /// Register a node type (re-registration is a no-op)
    pub fn with_node_type(mut self, node_type: NodeType) -> Self {
        if !self.node_types.contains(&node_type) {
            self.node_types.push(node_type);
        }
        self
    }

    /// Register an edge type (re-registration is a no-op)
    pub fn with_edge_type(mut self, edge_type: EdgeType) -> Self {
        if !self.edge_types.contains(&edge_type) {
            self.edge_types.push(edge_type);
        }
        self
    }

    /// Finish the schema, ready to be shared across graphs
    pub fn build(self) -> Arc<GraphMetadata> {
        Arc::new(GraphMetadata {
            node_types: self.node_types,
            edge_types: self.edge_types,
        })
    }
}
