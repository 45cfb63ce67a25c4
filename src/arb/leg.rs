//! A leg is one (venue, symbol, direction) step of a trail, line or shape.
//! It knows which currency it spends and which it receives.
use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

use super::types::{Currency, CurrencyPair, Market, MarketKey};

/// The direction of a leg through a market.
///
/// A market trades base against quote, so a leg can go either way: spend the base to
/// receive the quote, or spend the quote to receive the base.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Direction {
    /// Spend the base, receive the quote (bit 0)
    BaseToQuote,
    /// Spend the quote, receive the base (bit 1)
    QuoteToBase,
}

impl Direction {
    /// The opposite direction through the same market
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::BaseToQuote => Self::QuoteToBase,
            Self::QuoteToBase => Self::BaseToQuote,
        }
    }

    /// Checks if this direction is the opposite of another direction.
    #[must_use]
    pub fn is_opposite(self, other: Self) -> bool {
        self.flipped() == other
    }

    /// The currency spent when trading `pair` this way
    #[must_use]
    pub fn source_in(self, pair: &CurrencyPair) -> &Currency {
        match self {
            Self::BaseToQuote => &pair.base,
            Self::QuoteToBase => &pair.quote,
        }
    }

    /// The currency received when trading `pair` this way
    #[must_use]
    pub fn target_in(self, pair: &CurrencyPair) -> &Currency {
        self.flipped().source_in(pair)
    }

    /// The 0/1 encoding: 0 spends the base, 1 spends the quote
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::BaseToQuote => 0,
            Self::QuoteToBase => 1,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Debug for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseToQuote => write!(f, "b>q"),
            Self::QuoteToBase => write!(f, "q>b"),
        }
    }
}

/// A market traversed in one direction.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leg {
    /// The market the leg trades on
    pub market: Market,
    /// Which way the leg goes through the market
    pub direction: Direction,
}

impl Leg {
    /// Creates a leg
    #[must_use]
    pub const fn new(market: Market, direction: Direction) -> Self {
        Self { market, direction }
    }

    /// Venue and symbol of the leg's market
    #[must_use]
    pub const fn key(&self) -> &MarketKey {
        &self.market.key
    }

    /// The same market traversed the other way
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self::new(self.market.clone(), self.direction.flipped())
    }

    /// The currency the leg spends, if the market is resolved
    #[must_use]
    pub fn source(&self) -> Option<&Currency> {
        self.market
            .pair
            .as_ref()
            .map(|pair| self.direction.source_in(pair))
    }

    /// The currency the leg receives, if the market is resolved
    #[must_use]
    pub fn target(&self) -> Option<&Currency> {
        self.market
            .pair
            .as_ref()
            .map(|pair| self.direction.target_in(pair))
    }

    /// The direction in which `market` spends `currency`: base first, then quote.
    #[must_use]
    pub fn entering(market: &Market, currency: &str) -> Option<Direction> {
        let pair = market.pair.as_ref()?;
        if pair.base == currency {
            Some(Direction::BaseToQuote)
        } else if pair.quote == currency {
            Some(Direction::QuoteToBase)
        } else {
            None
        }
    }
}

impl Debug for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.market.key, self.direction)
    }
}

impl Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.source(), self.target()) {
            (Some(source), Some(target)) => {
                write!(f, "{} {}>{}", self.market.key, source, target)
            }
            _ => write!(f, "{} {}", self.market.key, self.direction.bit()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_source_and_target() {
        let sell = leg("a", "BTC/USDT", Direction::BaseToQuote);
        assert_eq!(sell.source().map(String::as_str), Some("BTC"));
        assert_eq!(sell.target().map(String::as_str), Some("USDT"));

        let buy = sell.flipped();
        assert_eq!(buy.direction, Direction::QuoteToBase);
        assert_eq!(buy.source().map(String::as_str), Some("USDT"));
        assert_eq!(buy.target().map(String::as_str), Some("BTC"));
        assert_eq!(buy.to_string(), "a:BTC/USDT USDT>BTC");
    }

    #[test]
    fn test_entering() {
        let btc = market("a", "BTC/USDT");
        assert_eq!(Leg::entering(&btc, "BTC"), Some(Direction::BaseToQuote));
        assert_eq!(Leg::entering(&btc, "USDT"), Some(Direction::QuoteToBase));
        assert_eq!(Leg::entering(&btc, "ETH"), None);
        assert_eq!(Leg::entering(&unresolved("a", "BTCUSDT"), "BTC"), None);
    }

    #[test]
    fn test_direction() {
        assert!(Direction::BaseToQuote.is_opposite(Direction::QuoteToBase));
        assert!(!Direction::BaseToQuote.is_opposite(Direction::BaseToQuote));
        assert_eq!(Direction::QuoteToBase.bit(), 1);
        assert_eq!(format!("{:?}", Direction::BaseToQuote), "b>q");
    }
}
