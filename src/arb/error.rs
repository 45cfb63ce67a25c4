use derive_more::{Display, Error};

use super::types::{Currency, Venue};

/// Everything that can go wrong while searching for shapes or building them by hand.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// A requested cycle length is below 2, or no length was requested at all
    #[display("Shape lengths must be at least 2, got {length}")]
    InvalidLength {
        /// The rejected length
        length: usize,
    },

    /// Two consecutive legs do not share a currency consistent with the running direction
    #[display("Leg {index} does not chain into leg {}", index + 1)]
    NonLinearTrail {
        /// Index of the leg whose target cannot be spent by the next leg
        index: usize,
    },

    /// The line does not end in the currency it starts with
    #[display("Line starts in {first} but ends in {last}")]
    NotCircular {
        /// Currency the first leg spends
        first: Currency,
        /// Currency the last leg receives
        last: Currency,
    },

    /// Lookup of a (venue, currency) or (venue, symbol) that is not in the line
    #[display("{venue}:{key} is not part of the line")]
    UnknownKey {
        /// Venue looked up
        venue: Venue,
        /// Currency or symbol looked up
        key: String,
    },

    /// Lookup of a (venue, currency) or (venue, symbol) that occurs more than once
    #[display("{venue}:{key} occurs {count} times in the line")]
    AmbiguousKey {
        /// Venue looked up
        venue: Venue,
        /// Currency or symbol looked up
        key: String,
        /// How many positions matched
        count: usize,
    },
}

/// Picks the single position out of `positions` or reports why there is not exactly one.
///
/// # Errors
///
/// `UnknownKey` when `positions` is empty, `AmbiguousKey` when it holds more than one index.
pub(crate) fn single_position(
    positions: &[usize],
    venue: &str,
    key: &str,
) -> Result<usize, ShapeError> {
    match positions {
        [index] => Ok(*index),
        [] => Err(ShapeError::UnknownKey {
            venue: venue.to_string(),
            key: key.to_string(),
        }),
        _ => Err(ShapeError::AmbiguousKey {
            venue: venue.to_string(),
            key: key.to_string(),
            count: positions.len(),
        }),
    }
}
