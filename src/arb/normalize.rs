//! Resolves every (venue, symbol) of a market snapshot to its base and quote currency.
//!
//! Venue adapters hand us whatever their exchange returns. The only parts we read are the
//! optional `base`/`quote` fields of a market and the symbol keys of the tickers; the rest of
//! the payload is carried along untouched.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::{CurrencyPair, Market, MarketKey, Symbol, Venue};

/// A market as a venue adapter describes it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketDescriptor {
    /// Explicit base currency, when the venue provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Explicit quote currency, when the venue provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    /// Everything else the venue sent, never inspected
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketDescriptor {
    /// A descriptor with explicit currencies
    #[must_use]
    pub fn with_pair(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            quote: Some(quote.into()),
            extra: Map::new(),
        }
    }

    /// The explicit pair if both sides are given, else whatever the symbol splits into
    #[must_use]
    pub fn resolve(&self, symbol: &str) -> Option<CurrencyPair> {
        match (&self.base, &self.quote) {
            (Some(base), Some(quote)) => Some(CurrencyPair::new(base.clone(), quote.clone())),
            _ => CurrencyPair::split(symbol),
        }
    }
}

/// A ticker as a venue adapter describes it. Only its presence matters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerDescriptor(pub Value);

/// venue -> symbol -> market descriptor (or nothing)
pub type MarketCatalogue = HashMap<Venue, HashMap<Symbol, Option<MarketDescriptor>>>;

/// venue -> symbol -> ticker
pub type TickerCatalogue = HashMap<Venue, HashMap<Symbol, TickerDescriptor>>;

/// venue -> symbol -> resolved pair, in venue then symbol order
pub type NormalizedCatalogue = BTreeMap<Venue, BTreeMap<Symbol, Option<CurrencyPair>>>;

/// Splits a ticker symbol, keeping it only if both sides are non-empty.
fn ticker_pair(symbol: &str) -> Option<CurrencyPair> {
    CurrencyPair::split(symbol).filter(|pair| !pair.base.is_empty() && !pair.quote.is_empty())
}

/// Computes the effective symbol set of every venue found in either catalogue.
///
/// When a venue has tickers, only markets with a live ticker survive. When it has only
/// tickers, the ticker symbols themselves become the markets. Symbols that cannot be
/// resolved are kept with a `None` pair.
#[must_use]
pub fn normalize(markets: &MarketCatalogue, tickers: &TickerCatalogue) -> NormalizedCatalogue {
    let mut normalized = NormalizedCatalogue::new();
    let venues = markets.keys().chain(tickers.keys());

    for venue in venues {
        if normalized.contains_key(venue) {
            continue;
        }

        let live: Option<BTreeMap<&Symbol, CurrencyPair>> = tickers.get(venue).map(|tickers| {
            tickers
                .keys()
                .filter_map(|symbol| ticker_pair(symbol).map(|pair| (symbol, pair)))
                .collect()
        });

        let symbols: BTreeMap<Symbol, Option<CurrencyPair>> = match (markets.get(venue), live) {
            (Some(markets), Some(live)) => markets
                .iter()
                .filter(|(symbol, _)| live.contains_key(symbol))
                .map(|(symbol, descriptor)| (symbol.clone(), resolve(symbol, descriptor.as_ref())))
                .collect(),
            (Some(markets), None) => markets
                .iter()
                .map(|(symbol, descriptor)| (symbol.clone(), resolve(symbol, descriptor.as_ref())))
                .collect(),
            (None, Some(live)) => live
                .into_iter()
                .map(|(symbol, pair)| (symbol.clone(), Some(pair)))
                .collect(),
            (None, None) => BTreeMap::new(),
        };

        debug!(
            "Venue {venue}: {} symbols, {} unresolved",
            symbols.len(),
            symbols.values().filter(|pair| pair.is_none()).count()
        );
        normalized.insert(venue.clone(), symbols);
    }

    normalized
}

fn resolve(symbol: &str, descriptor: Option<&MarketDescriptor>) -> Option<CurrencyPair> {
    descriptor.map_or_else(|| CurrencyPair::split(symbol), |descriptor| descriptor.resolve(symbol))
}

/// Flattens a normalized catalogue into markets, in venue then symbol order.
#[must_use]
pub fn markets(catalogue: &NormalizedCatalogue) -> Vec<Market> {
    catalogue
        .iter()
        .flat_map(|(venue, symbols)| {
            symbols.iter().map(move |(symbol, pair)| {
                Market::new(MarketKey::new(venue.clone(), symbol.clone()), pair.clone())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_markets_only() {
        let normalized = normalize(&catalogue(&[("a", &["A/B", "AB"])]), &TickerCatalogue::new());
        let symbols = &normalized["a"];
        assert_eq!(symbols["A/B"], Some(CurrencyPair::new("A", "B")));
        assert_eq!(symbols["AB"], None);
    }

    #[test]
    fn test_explicit_currencies_win() {
        let mut markets = MarketCatalogue::new();
        markets.entry("a".to_string()).or_default().insert(
            "XBTUSD".to_string(),
            Some(MarketDescriptor::with_pair("BTC", "USD")),
        );
        let normalized = normalize(&markets, &TickerCatalogue::new());
        assert_eq!(normalized["a"]["XBTUSD"], Some(CurrencyPair::new("BTC", "USD")));
    }

    #[test]
    fn test_half_explicit_descriptor_falls_back_to_symbol() {
        let descriptor = MarketDescriptor {
            base: Some("BTC".to_string()),
            ..MarketDescriptor::default()
        };
        assert_eq!(descriptor.resolve("XBT/USD"), Some(CurrencyPair::new("XBT", "USD")));
    }

    #[test]
    fn test_tickers_filter_markets() {
        let markets = catalogue(&[("a", &["A/B", "B/C", "C/A"])]);
        let tickers = tickers(&[("a", &["A/B", "C/A", "D/E"])]);
        let normalized = normalize(&markets, &tickers);
        assert_eq!(
            normalized["a"].keys().collect::<Vec<_>>(),
            vec!["A/B", "C/A"]
        );
    }

    #[test]
    fn test_tickers_only() {
        let tickers = tickers(&[("b", &["A/B", "A/", "ABC", "X/Y/Z"])]);
        let normalized = normalize(&MarketCatalogue::new(), &tickers);
        assert_eq!(normalized["b"].len(), 1);
        assert_eq!(normalized["b"]["A/B"], Some(CurrencyPair::new("A", "B")));
    }

    #[test]
    fn test_venues_from_either_side() {
        let markets = catalogue(&[("a", &["A/B"])]);
        let tickers = tickers(&[("b", &["A/B"])]);
        let normalized = normalize(&markets, &tickers);
        assert_eq!(normalized.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            markets_of(&normalized),
            vec![MarketKey::new("a", "A/B"), MarketKey::new("b", "A/B")]
        );
    }

    fn markets_of(normalized: &NormalizedCatalogue) -> Vec<MarketKey> {
        markets(normalized).into_iter().map(|market| market.key).collect()
    }
}
