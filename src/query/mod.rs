//! Traversal query engine: configuration builder and lazy cursor

mod cursor;
mod traverse;

pub use cursor::EdgeCursor;
pub use traverse::{EdgeFilter, TraversalBuilder, Traverser};
