//! Lazy pull-based cursor over traversal results

use super::traverse::EdgeFilter;
use crate::graph::{EdgeList, EdgeType, Graph, GraphEdge, NodeId};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use tracing::trace;

/// The node currently being expanded: its ranked edge snapshot plus the
/// position of the next unexamined edge
struct ActiveNode<K> {
    id: NodeId<K>,
    depth: usize,
    list: EdgeList,
    position: usize,
}

/// Lazy cursor over the edges discovered by a bounded ranked BFS
///
/// The search is a resumable state machine advanced only by pulls, so a
/// caller that stops after the first few edges never pays for unexplored
/// branches. Between pulls the cursor holds plain snapshot data and no
/// lock on the owning graph, so abandoning one can never corrupt the
/// graph.
///
/// Edges are yielded in discovery order: per expanded node in descending
/// weight, nodes in BFS layer order. No end node is yielded twice and the
/// start node is never revisited.
///
/// The cursor finishes exactly once, whether by exhaustion, hitting a
/// bound, [`EdgeCursor::close`], or drop. Finishing releases its buffers
/// and folds its traversed-edge count into the graph's aggregate
/// statistics.
pub struct EdgeCursor<'g, G: Graph> {
    graph: &'g G,
    edge_type: EdgeType,
    ordinal: usize,
    max_depth: Option<usize>,
    max_returned_edges: Option<usize>,
    max_traversed_edges: Option<usize>,
    filter: Option<EdgeFilter<G::Key>>,
    visited: HashSet<usize>,
    frontier: VecDeque<(usize, usize)>,
    active: Option<ActiveNode<G::Key>>,
    returned: usize,
    traversed: usize,
    closed: bool,
}

impl<'g, G: Graph> EdgeCursor<'g, G> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        graph: &'g G,
        start: &NodeId<G::Key>,
        edge_type: EdgeType,
        ordinal: usize,
        max_depth: Option<usize>,
        max_returned_edges: Option<usize>,
        max_traversed_edges: Option<usize>,
        filter: Option<EdgeFilter<G::Key>>,
    ) -> Self {
        let mut visited = HashSet::new();
        let mut frontier = VecDeque::new();
        if let Some(start_index) = graph.node_index(start) {
            visited.insert(start_index);
            frontier.push_back((start_index, 0));
        }
        Self {
            graph,
            edge_type,
            ordinal,
            max_depth,
            max_returned_edges,
            max_traversed_edges,
            filter,
            visited,
            frontier,
            active: None,
            returned: 0,
            traversed: 0,
            closed: false,
        }
    }

    /// Finish the traversal and release its buffers
    ///
    /// Idempotent. Subsequent pulls return `None`. Dropping the cursor
    /// closes it implicitly, so early abandonment still records
    /// statistics and frees traversal-scoped memory.
    pub fn close(&mut self) {
        self.finish();
    }

    /// Edges yielded so far
    pub fn returned(&self) -> usize {
        self.returned
    }

    /// Edges examined so far
    pub fn traversed(&self) -> usize {
        self.traversed
    }

    fn finish(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.graph.stats().record(self.traversed as u64);
        trace!(
            returned = self.returned,
            traversed = self.traversed,
            "traversal complete"
        );
        self.active = None;
        self.frontier = VecDeque::new();
        self.visited = HashSet::new();
    }
}

impl<'g, G: Graph> Iterator for EdgeCursor<'g, G> {
    type Item = GraphEdge<G::Key>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        loop {
            let has_edges = self
                .active
                .as_ref()
                .is_some_and(|a| a.position < a.list.len());
            if !has_edges {
                // Expand the next frontier node. Entries are enqueued only
                // when their depth is within bounds, so every dequeued node
                // is expandable.
                let Some((index, depth)) = self.frontier.pop_front() else {
                    self.finish();
                    return None;
                };
                let Some(id) = self.graph.node_at(index) else {
                    continue;
                };
                let list = self.graph.ranked_edges(index, self.ordinal);
                self.active = Some(ActiveNode {
                    id,
                    depth,
                    list,
                    position: 0,
                });
                continue;
            }

            // The next edge may only be examined while under the work
            // bound, so the examined count never exceeds it.
            if self
                .max_traversed_edges
                .is_some_and(|max| self.traversed >= max)
            {
                self.finish();
                return None;
            }

            let Some(active) = self.active.as_mut() else {
                continue;
            };
            let Some(slot) = active.list.get(active.position) else {
                continue;
            };
            active.position += 1;
            let depth = active.depth;
            self.traversed += 1;

            // No revisits: prevents cycles and duplicate yields.
            if self.visited.contains(&slot.target) {
                continue;
            }
            let Some(end) = self.graph.node_at(slot.target) else {
                continue;
            };
            let accepted = match &self.filter {
                Some(filter) => filter(&active.id, &end),
                None => true,
            };
            if !accepted {
                // Rejected targets stay unvisited; another edge may still
                // reach them.
                continue;
            }

            self.visited.insert(slot.target);
            if self.max_depth.map_or(true, |max| depth + 1 <= max) {
                self.frontier.push_back((slot.target, depth + 1));
            }

            self.returned += 1;
            let edge = GraphEdge::new(
                active.id.clone(),
                end,
                self.edge_type.clone(),
                slot.weight,
            );
            if self
                .max_returned_edges
                .is_some_and(|max| self.returned >= max)
            {
                self.finish();
            }
            return Some(edge);
        }
    }
}

impl<G: Graph> Drop for EdgeCursor<'_, G> {
    fn drop(&mut self) {
        self.finish();
    }
}

impl<G: Graph> fmt::Debug for EdgeCursor<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeCursor")
            .field("edge_type", &self.edge_type)
            .field("returned", &self.returned)
            .field("traversed", &self.traversed)
            .field("closed", &self.closed)
            .finish()
    }
}
