//! Aggregate traversal statistics for operational monitoring

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Read-only aggregate counters over every traversal a graph has served
///
/// Updated atomically exactly once per cursor lifetime, when the cursor
/// finishes (exhaustion, bound hit, close, or drop).
#[derive(Debug, Default)]
pub struct TraversalStats {
    traversal_count: AtomicU64,
    edges_traversed: AtomicU64,
    max_edges_traversed: AtomicU64,
}

impl TraversalStats {
    /// Total traversal invocations served
    pub fn traversal_count(&self) -> u64 {
        self.traversal_count.load(Ordering::Relaxed)
    }

    /// Total edges examined across all traversals
    pub fn edges_traversed(&self) -> u64 {
        self.edges_traversed.load(Ordering::Relaxed)
    }

    /// Most edges examined by any single traversal
    pub fn max_edges_traversed(&self) -> u64 {
        self.max_edges_traversed.load(Ordering::Relaxed)
    }

    /// Capture a point-in-time copy of the counters
    pub fn snapshot(&self) -> TraversalStatsSnapshot {
        TraversalStatsSnapshot {
            traversal_count: self.traversal_count(),
            edges_traversed: self.edges_traversed(),
            max_edges_traversed: self.max_edges_traversed(),
        }
    }

    /// Fold one completed traversal into the aggregates
    pub(crate) fn record(&self, traversed: u64) {
        self.traversal_count.fetch_add(1, Ordering::Relaxed);
        self.edges_traversed.fetch_add(traversed, Ordering::Relaxed);
        self.max_edges_traversed.fetch_max(traversed, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`TraversalStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStatsSnapshot {
    /// Total traversal invocations served
    pub traversal_count: u64,
    /// Total edges examined across all traversals
    pub edges_traversed: u64,
    /// Most edges examined by any single traversal
    pub max_edges_traversed: u64,
}
