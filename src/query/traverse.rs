//! Traversal configuration: builder and reusable traverser

use super::cursor::EdgeCursor;
use crate::graph::{EdgeType, Graph, GraphEdge, GraphError, GraphResult, NodeId};
use std::fmt;
use std::sync::Arc;

/// Predicate applied to each candidate edge before it is accepted into the
/// result or used to continue expansion
pub type EdgeFilter<K> = Arc<dyn Fn(&NodeId<K>, &NodeId<K>) -> bool + Send + Sync>;

/// Builder for a bounded ranked traversal
///
/// Obtained from [`Graph::prepare_traversal`]. All bounds default to
/// unbounded and the filter defaults to accept-all.
pub struct TraversalBuilder<'g, G: Graph> {
    graph: &'g G,
    start: NodeId<G::Key>,
    edge_type: EdgeType,
    max_depth: Option<usize>,
    max_returned_edges: Option<usize>,
    max_traversed_edges: Option<usize>,
    filter: Option<EdgeFilter<G::Key>>,
}

impl<'g, G: Graph> TraversalBuilder<'g, G> {
    pub(crate) fn new(graph: &'g G, start: NodeId<G::Key>, edge_type: EdgeType) -> Self {
        Self {
            graph,
            start,
            edge_type,
            max_depth: None,
            max_returned_edges: None,
            max_traversed_edges: None,
            filter: None,
        }
    }

    /// Deepest level whose nodes may still be expanded
    ///
    /// Depth 0 is the start node, so `max_depth(0)` limits the traversal
    /// to direct neighbors.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Cap on edges yielded to the caller
    pub fn max_returned_edges(mut self, max_returned_edges: usize) -> Self {
        self.max_returned_edges = Some(max_returned_edges);
        self
    }

    /// Cap on edges examined during the search
    ///
    /// Bounds the work done even when most edges are filtered out or
    /// lead to already-visited nodes.
    pub fn max_traversed_edges(mut self, max_traversed_edges: usize) -> Self {
        self.max_traversed_edges = Some(max_traversed_edges);
        self
    }

    /// Accept an edge `(start, end)` only when the predicate holds
    ///
    /// Rejected targets are not marked visited, so another (higher-ranked
    /// or shallower) edge may still reach them later.
    pub fn edge_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&NodeId<G::Key>, &NodeId<G::Key>) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Validate the configuration against the graph's schema
    ///
    /// Errors if the edge type is outside the graph's metadata. A start
    /// node the graph does not contain is not an error; traversing such a
    /// configuration yields nothing.
    pub fn build(self) -> GraphResult<Traverser<'g, G>> {
        let ordinal = self
            .graph
            .metadata()
            .edge_type_ordinal(&self.edge_type)
            .ok_or_else(|| GraphError::UnknownEdgeType(self.edge_type.to_string()))?;
        Ok(Traverser {
            graph: self.graph,
            start: self.start,
            edge_type: self.edge_type,
            ordinal,
            max_depth: self.max_depth,
            max_returned_edges: self.max_returned_edges,
            max_traversed_edges: self.max_traversed_edges,
            filter: self.filter,
        })
    }
}

impl<G: Graph> fmt::Debug for TraversalBuilder<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalBuilder")
            .field("start", &self.start)
            .field("edge_type", &self.edge_type)
            .field("max_depth", &self.max_depth)
            .field("max_returned_edges", &self.max_returned_edges)
            .field("max_traversed_edges", &self.max_traversed_edges)
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

/// An immutable, reusable traversal configuration
///
/// Each [`Traverser::traverse`] call starts a fresh, independent run;
/// the configuration is never consumed.
pub struct Traverser<'g, G: Graph> {
    graph: &'g G,
    start: NodeId<G::Key>,
    edge_type: EdgeType,
    ordinal: usize,
    max_depth: Option<usize>,
    max_returned_edges: Option<usize>,
    max_traversed_edges: Option<usize>,
    filter: Option<EdgeFilter<G::Key>>,
}

impl<'g, G: Graph> Traverser<'g, G> {
    /// Start a fresh traversal run
    ///
    /// The start node is resolved per run, so a node added to a mutable
    /// graph after this traverser was built is still found.
    pub fn traverse(&self) -> EdgeCursor<'g, G> {
        EdgeCursor::new(
            self.graph,
            &self.start,
            self.edge_type.clone(),
            self.ordinal,
            self.max_depth,
            self.max_returned_edges,
            self.max_traversed_edges,
            self.filter.clone(),
        )
    }

    /// Drain a fresh run into an ordered sequence
    ///
    /// Equivalent to collecting the cursor returned by
    /// [`Self::traverse`]; never diverges from manual iteration.
    pub fn get_path(&self) -> Vec<GraphEdge<G::Key>> {
        self.traverse().collect()
    }
}

impl<G: Graph> fmt::Debug for Traverser<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traverser")
            .field("start", &self.start)
            .field("edge_type", &self.edge_type)
            .field("max_depth", &self.max_depth)
            .field("max_returned_edges", &self.max_returned_edges)
            .field("max_traversed_edges", &self.max_traversed_edges)
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
