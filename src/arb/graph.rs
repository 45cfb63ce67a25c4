//! Which market can follow which, and through which of its currencies.

use std::collections::HashMap;

use log::{debug, warn};

use super::leg::Direction;
use super::types::{Market, MarketKey};

/// An edge from one market to a later-ranked market sharing a currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Index of the destination market in rank order
    pub to: usize,
    /// `QuoteToBase` when the shared currency is the source market's base,
    /// `BaseToQuote` when it is its quote
    pub direction: Direction,
}

/// Adjacency between markets, built in a single direction along the canonical rank.
///
/// Markets are stored in rank order and addressed by index; an edge always points from a
/// lower index to a higher one, so no pair of markets is ever connected both ways.
#[derive(Debug, Clone, Default)]
pub struct SymbolGraph {
    /// Markets in rank order
    markets: Vec<Market>,
    /// Outgoing edges per market, parallel to `markets`
    edges: Vec<Vec<Edge>>,
    /// Position of every market key
    index: HashMap<MarketKey, usize>,
}

impl SymbolGraph {
    /// Builds the graph from markets already sorted by [`Ranker::rank`](super::rank::Ranker::rank).
    ///
    /// For every pair `(i, j)` with `j` after `i` and both resolved, an edge `i -> j` is added
    /// once for `i`'s base if `j` trades it and once for `i`'s quote if `j` trades it. Two
    /// markets over the same pair therefore get two parallel edges.
    #[must_use]
    pub fn build(ranked: Vec<Market>) -> Self {
        let mut edges = vec![Vec::new(); ranked.len()];

        for (i, market) in ranked.iter().enumerate() {
            let Some(pair) = &market.pair else {
                continue;
            };
            for (j, other) in ranked.iter().enumerate().skip(i + 1) {
                let Some(other_pair) = &other.pair else {
                    continue;
                };
                if other_pair.contains(&pair.base) {
                    edges[i].push(Edge {
                        to: j,
                        direction: Direction::QuoteToBase,
                    });
                }
                if other_pair.contains(&pair.quote) {
                    edges[i].push(Edge {
                        to: j,
                        direction: Direction::BaseToQuote,
                    });
                }
            }
        }

        let unresolved = ranked.iter().filter(|market| !market.is_resolved()).count();
        if unresolved > 0 {
            warn!("{unresolved} markets could not be resolved and have no edges");
        }

        let index = ranked
            .iter()
            .enumerate()
            .map(|(position, market)| (market.key.clone(), position))
            .collect();

        let graph = Self {
            markets: ranked,
            edges,
            index,
        };
        debug!(
            "Built symbol graph with {} markets and {} edges",
            graph.len(),
            graph.edge_count()
        );
        graph
    }

    /// Number of markets
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether the graph has no markets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Total number of edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Markets in rank order
    #[must_use]
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// The market at `position`
    #[must_use]
    pub fn market(&self, position: usize) -> Option<&Market> {
        self.markets.get(position)
    }

    /// Outgoing edges of the market at `position`
    #[must_use]
    pub fn edges(&self, position: usize) -> &[Edge] {
        self.edges.get(position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rank position of `key`
    #[must_use]
    pub fn position(&self, key: &MarketKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Outgoing edges of `key` as (destination key, direction), `None` if the key is unknown.
    #[must_use]
    pub fn neighbours(&self, key: &MarketKey) -> Option<Vec<(&MarketKey, Direction)>> {
        let position = self.position(key)?;
        Some(
            self.edges(position)
                .iter()
                .map(|edge| (&self.markets[edge.to].key, edge.direction))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_parallel_edges_for_same_pair() {
        let graph = SymbolGraph::build(vec![market("a", "A/B"), market("b", "A/B")]);
        let a = MarketKey::new("a", "A/B");
        let b = MarketKey::new("b", "A/B");

        assert_eq!(
            graph.neighbours(&a),
            Some(vec![(&b, Direction::QuoteToBase), (&b, Direction::BaseToQuote)])
        );
        assert_eq!(graph.neighbours(&b), Some(vec![]));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_single_direction_per_pair() {
        let graph = SymbolGraph::build(vec![
            market("a", "ETH/BTC"),
            market("a", "BTC/USDT"),
            market("a", "ETH/USDT"),
        ]);
        for from in 0..graph.len() {
            for edge in graph.edges(from) {
                assert!(edge.to > from);
                assert!(graph.edges(edge.to).iter().all(|back| back.to != from));
            }
        }
        // ETH/BTC shares its base with ETH/USDT and its quote with BTC/USDT
        let eth_btc = MarketKey::new("a", "ETH/BTC");
        assert_eq!(
            graph.neighbours(&eth_btc),
            Some(vec![
                (&MarketKey::new("a", "BTC/USDT"), Direction::BaseToQuote),
                (&MarketKey::new("a", "ETH/USDT"), Direction::QuoteToBase),
            ])
        );
    }

    #[test]
    fn test_unresolved_markets_have_no_edges() {
        let graph = SymbolGraph::build(vec![
            market("a", "A/B"),
            unresolved("a", "AB"),
            market("b", "A/B"),
        ]);
        assert_eq!(graph.len(), 3);
        assert!(graph.edges(1).is_empty());
        assert!(graph.edges(0).iter().all(|edge| edge.to == 2));
        assert_eq!(graph.neighbours(&MarketKey::new("c", "A/B")), None);
    }
}
