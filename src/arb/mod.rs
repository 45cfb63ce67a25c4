//! # Shape Discovery
//!
//! Finds closed cycles of markets ("shapes") across any number of venues, so that a
//! currency can be spent on one market and received back on another after a few hops.
//! Snapshots are normalized, ranked into a canonical order, turned into a one-way symbol
//! graph and searched depth-first for cycles of the requested lengths.

/// Error types
pub mod error;
/// One-way adjacency between ranked markets
pub mod graph;
/// Directed traversal of a single market
pub mod leg;
/// Chains of legs
pub mod line;
/// Snapshot normalization
pub mod normalize;
/// Rotated and reversed views of a line
pub mod path;
/// Canonical market order
pub mod rank;
/// Cycle search
pub mod search;
/// Closed lines
pub mod shape;
/// Test helpers and utilities
#[cfg(test)]
mod test_helpers;
/// Common type definitions
pub mod types;

pub use error::ShapeError;
pub use graph::SymbolGraph;
pub use leg::{Direction, Leg};
pub use line::{LegSequence, Line};
pub use normalize::{MarketCatalogue, MarketDescriptor, TickerCatalogue, TickerDescriptor};
pub use path::{Path, Polarity};
pub use search::{
    build_graph, find_shapes, find_shapes_in_graph, find_shapes_of_length, SearchOptions,
};
pub use shape::Shape;
pub use types::{CurrencyPair, Market, MarketKey};
