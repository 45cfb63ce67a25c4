//! Lines are chains of legs where every leg spends what the previous one received.
//! Shapes and paths are both built on top of a line.
use std::fmt::{self, Debug, Display};

use itertools::Itertools;
use serde::Serialize;

use super::error::{single_position, ShapeError};
use super::leg::{Direction, Leg};
use super::types::{Currency, Market, Venue};

/// Read access shared by lines, shapes and paths, with key lookups on top.
pub trait LegSequence {
    /// The legs in traversal order
    fn legs(&self) -> &[Leg];

    /// The currency at every junction: `cys[0]` is spent by the first leg, `cys[i + 1]` is
    /// received by leg `i`
    fn cys(&self) -> &[Currency];

    /// Number of legs
    fn len(&self) -> usize {
        self.legs().len()
    }

    /// Whether there are no legs. Never true for a constructed line.
    fn is_empty(&self) -> bool {
        self.legs().is_empty()
    }

    /// Venues involved, in order of first appearance
    fn venues(&self) -> Vec<&Venue> {
        self.legs().iter().map(|leg| &leg.key().venue).unique().collect()
    }

    /// Position of the leg trading `symbol` on `venue`.
    ///
    /// # Errors
    ///
    /// `UnknownKey` if no leg trades it, `AmbiguousKey` if several do.
    fn leg_index(&self, venue: &str, symbol: &str) -> Result<usize, ShapeError> {
        let positions = self
            .legs()
            .iter()
            .positions(|leg| leg.key().venue == venue && leg.key().symbol == symbol)
            .collect_vec();
        single_position(&positions, venue, symbol)
    }

    /// Position of the leg that spends `currency` on `venue`.
    ///
    /// # Errors
    ///
    /// `UnknownKey` if no leg on `venue` spends it, `AmbiguousKey` if several do.
    fn currency_index(&self, venue: &str, currency: &str) -> Result<usize, ShapeError> {
        let positions = self
            .legs()
            .iter()
            .positions(|leg| {
                leg.key().venue == venue && leg.source().is_some_and(|source| source == currency)
            })
            .collect_vec();
        single_position(&positions, venue, currency)
    }
}

/// An open chain of legs with its junction currencies resolved.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Line {
    /// Legs in traversal order
    legs: Vec<Leg>,
    /// Junction currencies, one more than there are legs
    cys: Vec<Currency>,
}

impl Line {
    /// Builds a line from legs whose directions are already known.
    ///
    /// # Errors
    ///
    /// `NonLinearTrail` if there are no legs, a leg's market is unresolved, or a leg receives
    /// something other than what the next leg spends.
    pub fn from_legs(legs: Vec<Leg>) -> Result<Self, ShapeError> {
        let Some(first) = legs.first().and_then(Leg::source) else {
            return Err(ShapeError::NonLinearTrail { index: 0 });
        };

        let mut cys = Vec::with_capacity(legs.len() + 1);
        cys.push(first.clone());

        for (index, leg) in legs.iter().enumerate() {
            let Some(target) = leg.target() else {
                return Err(ShapeError::NonLinearTrail { index });
            };
            if let Some(next) = legs.get(index + 1) {
                if next.source() != Some(target) {
                    return Err(ShapeError::NonLinearTrail { index });
                }
            }
            cys.push(target.clone());
        }

        Ok(Self { legs, cys })
    }

    /// Builds a line from markets, working out each leg's direction from the currency the
    /// previous leg received.
    ///
    /// The first leg uses `initial` when given. Otherwise it goes whichever way hands the
    /// second market a currency it trades, base to quote when both do.
    ///
    /// # Errors
    ///
    /// `NonLinearTrail` if there are no markets, a market is unresolved, or a market does not
    /// trade the currency the previous leg received.
    pub fn chain(markets: Vec<Market>, initial: Option<Direction>) -> Result<Self, ShapeError> {
        let mut markets = markets.into_iter();
        let Some(first) = markets.next() else {
            return Err(ShapeError::NonLinearTrail { index: 0 });
        };
        let rest = markets.collect_vec();

        let direction = match (initial, rest.first()) {
            (Some(direction), _) => direction,
            (None, None) => Direction::BaseToQuote,
            (None, Some(next)) => [Direction::BaseToQuote, Direction::QuoteToBase]
                .into_iter()
                .find(|direction| {
                    Leg::new(first.clone(), *direction)
                        .target()
                        .is_some_and(|target| Leg::entering(next, target).is_some())
                })
                .ok_or(ShapeError::NonLinearTrail { index: 0 })?,
        };

        let mut legs = Vec::with_capacity(rest.len() + 1);
        legs.push(Leg::new(first, direction));

        for (index, market) in rest.into_iter().enumerate() {
            let direction = legs
                .last()
                .and_then(Leg::target)
                .and_then(|received| Leg::entering(&market, received))
                .ok_or(ShapeError::NonLinearTrail { index })?;
            legs.push(Leg::new(market, direction));
        }

        Self::from_legs(legs)
    }

    /// Currency spent by the first leg
    #[must_use]
    pub fn first_currency(&self) -> &Currency {
        &self.cys[0]
    }

    /// Currency received by the last leg
    #[must_use]
    pub fn last_currency(&self) -> &Currency {
        &self.cys[self.cys.len() - 1]
    }

    /// Whether the line ends in the currency it starts with
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.first_currency() == self.last_currency()
    }

    /// Consumes the line, handing back its legs
    #[must_use]
    pub fn into_legs(self) -> Vec<Leg> {
        self.legs
    }
}

impl LegSequence for Line {
    fn legs(&self) -> &[Leg] {
        &self.legs
    }

    fn cys(&self) -> &[Currency] {
        &self.cys
    }
}

impl Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?})", self.legs.iter().format(", "))
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]",
            self.legs.iter().map(|leg| leg.key()).format(" -> "),
            self.cys.iter().format(",")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_from_legs() {
        let line = Line::from_legs(vec![
            leg("a", "BTC/USDT", Direction::BaseToQuote),
            leg("a", "ETH/USDT", Direction::QuoteToBase),
            leg("b", "ETH/BTC", Direction::BaseToQuote),
        ])
        .unwrap();
        assert_eq!(line.cys(), ["BTC", "USDT", "ETH", "BTC"]);
        assert!(line.is_closed());
        assert_eq!(
            line.to_string(),
            "a:BTC/USDT -> a:ETH/USDT -> b:ETH/BTC [BTC,USDT,ETH,BTC]"
        );
    }

    #[test]
    fn test_from_legs_gap() {
        let line = Line::from_legs(vec![
            leg("a", "BTC/USDT", Direction::BaseToQuote),
            leg("a", "ETH/USDT", Direction::BaseToQuote),
        ]);
        assert_eq!(
            line.err().unwrap().to_string(),
            "Leg 0 does not chain into leg 1"
        );
    }

    #[test]
    fn test_from_legs_unresolved_or_empty() {
        assert_eq!(
            Line::from_legs(vec![]).err(),
            Some(ShapeError::NonLinearTrail { index: 0 })
        );
        let line = Line::from_legs(vec![
            leg("a", "BTC/USDT", Direction::BaseToQuote),
            Leg::new(unresolved("a", "USDTETH"), Direction::BaseToQuote),
        ]);
        assert_eq!(line.err(), Some(ShapeError::NonLinearTrail { index: 0 }));
    }

    #[test]
    fn test_chain_infers_directions() {
        let line = Line::chain(
            vec![
                market("a", "ETH/BTC"),
                market("a", "ETH/USDT"),
                market("a", "BTC/USDT"),
            ],
            None,
        )
        .unwrap();
        // ETH/BTC must go BTC -> ETH for ETH/USDT to take over
        assert_eq!(line.cys(), ["BTC", "ETH", "USDT", "BTC"]);
        assert_eq!(line.legs()[0].direction, Direction::QuoteToBase);
    }

    #[test]
    fn test_chain_with_forced_direction() {
        let line = Line::chain(
            vec![market("a", "A/B"), market("b", "A/B")],
            Some(Direction::QuoteToBase),
        )
        .unwrap();
        assert_eq!(line.cys(), ["B", "A", "B"]);

        let legs = line.into_legs();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0], leg("a", "A/B", Direction::QuoteToBase));
        assert_eq!(legs[1], leg("b", "A/B", Direction::BaseToQuote));
    }

    #[test]
    fn test_chain_not_linear() {
        let line = Line::chain(vec![market("a", "A/B"), market("a", "C/D")], None);
        assert_eq!(line.err(), Some(ShapeError::NonLinearTrail { index: 0 }));

        let line = Line::chain(
            vec![market("a", "A/B"), market("a", "B/C"), market("a", "D/E")],
            None,
        );
        assert_eq!(line.err(), Some(ShapeError::NonLinearTrail { index: 1 }));
    }

    #[test]
    fn test_lookups() {
        let line = Line::chain(
            vec![market("a", "A/B"), market("b", "A/B"), market("b", "A/C")],
            None,
        );
        // A/B then A/B goes A -> B -> A, then A/C spends A on b
        let line = line.unwrap();
        assert_eq!(line.cys(), ["A", "B", "A", "C"]);
        assert_eq!(line.leg_index("b", "A/C"), Ok(2));
        assert_eq!(line.currency_index("a", "A"), Ok(0));
        assert_eq!(line.currency_index("b", "B"), Ok(1));
        assert_eq!(line.venues(), vec!["a", "b"]);
        assert_eq!(
            line.leg_index("c", "A/B").err().unwrap().to_string(),
            "c:A/B is not part of the line"
        );
        assert_eq!(
            line.currency_index("b", "C"),
            Err(ShapeError::UnknownKey {
                venue: "b".to_string(),
                key: "C".to_string(),
            })
        );
    }

    #[test]
    fn test_ambiguous_lookups() {
        let line = Line::chain(
            vec![market("a", "A/B"), market("b", "A/B"), market("a", "A/B")],
            None,
        )
        .unwrap();
        assert_eq!(line.cys(), ["A", "B", "A", "B"]);
        assert_eq!(
            line.leg_index("a", "A/B").err().unwrap().to_string(),
            "a:A/B occurs 2 times in the line"
        );
        assert_eq!(
            line.currency_index("a", "A"),
            Err(ShapeError::AmbiguousKey {
                venue: "a".to_string(),
                key: "A".to_string(),
                count: 2,
            })
        );
        assert_eq!(line.leg_index("b", "A/B"), Ok(1));
    }
}
