use std::collections::HashMap;

use super::leg::{Direction, Leg};
use super::normalize::{MarketCatalogue, TickerCatalogue, TickerDescriptor};
use super::types::{CurrencyPair, Market, MarketKey};

#[allow(dead_code)]
pub fn market(venue: &str, symbol: &str) -> Market {
    Market::new(MarketKey::new(venue, symbol), CurrencyPair::split(symbol))
}

#[allow(dead_code)]
pub fn unresolved(venue: &str, symbol: &str) -> Market {
    Market::new(MarketKey::new(venue, symbol), None)
}

#[allow(dead_code)]
pub fn leg(venue: &str, symbol: &str, direction: Direction) -> Leg {
    Leg::new(market(venue, symbol), direction)
}

#[allow(dead_code)]
pub fn catalogue(venues: &[(&str, &[&str])]) -> MarketCatalogue {
    venues
        .iter()
        .map(|(venue, symbols)| {
            let symbols: HashMap<_, _> = symbols
                .iter()
                .map(|symbol| ((*symbol).to_string(), None))
                .collect();
            ((*venue).to_string(), symbols)
        })
        .collect()
}

#[allow(dead_code)]
pub fn tickers(venues: &[(&str, &[&str])]) -> TickerCatalogue {
    venues
        .iter()
        .map(|(venue, symbols)| {
            let symbols: HashMap<_, _> = symbols
                .iter()
                .map(|symbol| ((*symbol).to_string(), TickerDescriptor::default()))
                .collect();
            ((*venue).to_string(), symbols)
        })
        .collect()
}
