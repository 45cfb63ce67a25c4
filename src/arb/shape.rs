//! A shape is a line that ends in the currency it starts with: a closed cycle of market legs.
//! Shapes are what the search produces and what pricing downstream walks through, one path
//! at a time.
use std::fmt::{self, Debug, Display};

use itertools::Itertools;
use serde::Serialize;

use super::error::ShapeError;
use super::leg::{Direction, Leg};
use super::line::{LegSequence, Line};
use super::path::{Path, Polarity};
use super::types::{Currency, Market};

/// A closed, currency-consistent cycle of legs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Shape {
    /// The underlying line; its first and last currency are equal
    line: Line,
}

impl Shape {
    /// Wraps a line, checking that it closes.
    ///
    /// # Errors
    ///
    /// `NotCircular` if the line ends in a different currency than it starts with.
    pub fn new(line: Line) -> Result<Self, ShapeError> {
        if !line.is_closed() {
            return Err(ShapeError::NotCircular {
                first: line.first_currency().clone(),
                last: line.last_currency().clone(),
            });
        }
        Ok(Self { line })
    }

    /// Builds a shape from legs whose directions are already known.
    ///
    /// # Errors
    ///
    /// `NonLinearTrail` if the legs do not chain, `NotCircular` if they do not close.
    pub fn from_legs(legs: Vec<Leg>) -> Result<Self, ShapeError> {
        Self::new(Line::from_legs(legs)?)
    }

    /// Builds a shape from markets, inferring directions as [`Line::chain`] does.
    ///
    /// # Errors
    ///
    /// `NonLinearTrail` if the markets do not chain, `NotCircular` if they do not close.
    pub fn chain(markets: Vec<Market>, initial: Option<Direction>) -> Result<Self, ShapeError> {
        Self::new(Line::chain(markets, initial)?)
    }

    /// The underlying line
    #[must_use]
    pub const fn line(&self) -> &Line {
        &self.line
    }

    /// Every rotation in both polarities: `2n` paths, forward before backward per start.
    ///
    /// # Errors
    ///
    /// Propagates path construction errors, which a closed shape does not produce.
    pub fn paths(&self) -> Result<Vec<Path>, ShapeError> {
        (0..self.len())
            .cartesian_product([Polarity::Forward, Polarity::Backward])
            .map(|(start, polarity)| Path::new(self, start, polarity))
            .collect()
    }

    /// The paths with rotational and reflective duplicates removed.
    ///
    /// A shape of three or more legs keeps all `2n` paths. Two legs give exactly two paths,
    /// both spending the shape's first currency: through the first leg forward, and through
    /// the second leg backward. A single leg has only its forward path.
    ///
    /// # Errors
    ///
    /// Propagates path construction errors, which a closed shape does not produce.
    pub fn unique_paths(&self) -> Result<Vec<Path>, ShapeError> {
        match self.len() {
            1 => Ok(vec![Path::new(self, 0, Polarity::Forward)?]),
            2 => Ok(vec![
                Path::new(self, 0, Polarity::Forward)?,
                Path::new(self, 1, Polarity::Backward)?,
            ]),
            _ => self.paths(),
        }
    }
}

impl LegSequence for Shape {
    fn legs(&self) -> &[Leg] {
        self.line.legs()
    }

    fn cys(&self) -> &[Currency] {
        self.line.cys()
    }
}

impl Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.legs().iter().format(", "))
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.line, f)
    }
}
