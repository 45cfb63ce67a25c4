use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

/// Type alias for a trading venue identifier, represented as a string.
pub type Venue = String;

/// Type alias for a currency identifier, represented as a string.
pub type Currency = String;

/// Type alias for a venue symbol, conventionally `BASE/QUOTE`.
pub type Symbol = String;

/// One tradable instrument on one venue
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarketKey {
    /// The venue the symbol is listed on
    pub venue: Venue,
    /// The symbol as the venue names it
    pub symbol: Symbol,
}

impl MarketKey {
    /// Creates a key from anything string-like.
    #[must_use]
    pub fn new(venue: impl Into<Venue>, symbol: impl Into<Symbol>) -> Self {
        Self {
            venue: venue.into(),
            symbol: symbol.into(),
        }
    }
}

impl Debug for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.venue, self.symbol)
    }
}

impl Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.venue, self.symbol)
    }
}

/// The two currencies a market trades: the base is priced in the quote.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency being bought or sold
    pub base: Currency,
    /// Currency the base is priced in
    pub quote: Currency,
}

impl CurrencyPair {
    /// Creates a pair from anything string-like.
    #[must_use]
    pub fn new(base: impl Into<Currency>, quote: impl Into<Currency>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// Splits a `BASE/QUOTE` symbol. Anything that does not split into exactly
    /// two parts yields `None`.
    #[must_use]
    pub fn split(symbol: &str) -> Option<Self> {
        let mut parts = symbol.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) => Some(Self::new(base, quote)),
            _ => None,
        }
    }

    /// Whether `currency` is one of the two sides of the pair.
    #[must_use]
    pub fn contains(&self, currency: &str) -> bool {
        self.base == currency || self.quote == currency
    }
}

/// A market key together with its resolved currencies.
///
/// `pair` is `None` when the symbol could not be resolved. Such markets stay in the
/// graph as nodes but never get an edge.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    /// Venue and symbol
    pub key: MarketKey,
    /// Base and quote, if known
    pub pair: Option<CurrencyPair>,
}

impl Market {
    /// Creates a market from its key and (maybe) resolved pair.
    #[must_use]
    pub const fn new(key: MarketKey, pair: Option<CurrencyPair>) -> Self {
        Self { key, pair }
    }

    /// Venue the market trades on
    #[must_use]
    pub fn venue(&self) -> &str {
        &self.key.venue
    }

    /// Base currency, if resolved
    #[must_use]
    pub fn base(&self) -> Option<&Currency> {
        self.pair.as_ref().map(|pair| &pair.base)
    }

    /// Quote currency, if resolved
    #[must_use]
    pub fn quote(&self) -> Option<&Currency> {
        self.pair.as_ref().map(|pair| &pair.quote)
    }

    /// Whether both currencies are known
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.pair.is_some()
    }
}

impl Debug for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pair {
            Some(pair) => write!(f, "{:?}({}/{})", self.key, pair.base, pair.quote),
            None => write!(f, "{:?}(?)", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        assert_eq!(CurrencyPair::split("BTC/USDT"), Some(CurrencyPair::new("BTC", "USDT")));
        assert_eq!(CurrencyPair::split("BTCUSDT"), None);
        assert_eq!(CurrencyPair::split("BTC/USDT/PERP"), None);
    }

    #[test]
    fn test_unresolved_market() {
        let market = Market::new(MarketKey::new("a", "BTCUSDT"), None);
        assert!(!market.is_resolved());
        assert_eq!(market.base(), None);
        assert_eq!(format!("{market:?}"), "a:BTCUSDT(?)");
    }
}
