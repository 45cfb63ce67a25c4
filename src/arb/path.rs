use std::fmt::{self, Debug, Display};

use serde::Serialize;

use super::error::ShapeError;
use super::leg::Leg;
use super::line::{LegSequence, Line};
use super::types::Currency;

/// Traversal sense of a path relative to the line it was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Polarity {
    /// Same leg order and directions as the parent (+1)
    Forward,
    /// Reversed leg order, every leg flipped (-1)
    Backward,
}

impl Polarity {
    /// +1 or -1
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// One directed view of a line or shape: rotated to begin at `start` and, when backward,
/// reversed with every leg flipped.
///
/// The junction currencies are resolved again from the path's own leg order. Reversing a
/// line swaps which side of every junction is spent and which is received, so they are not
/// the parent's currencies read backwards.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Path {
    /// Index, in the parent, of the leg the path starts with
    start: usize,
    /// Which way the parent is traversed
    polarity: Polarity,
    /// The rotated, possibly reversed legs
    line: Line,
}

impl Path {
    /// Derives the path starting at leg `start` (taken modulo the number of legs).
    ///
    /// # Errors
    ///
    /// `NonLinearTrail` if the parent has no legs, or if it is an open line and the rotation
    /// makes its last leg feed its first.
    pub fn new<L: LegSequence>(
        parent: &L,
        start: usize,
        polarity: Polarity,
    ) -> Result<Self, ShapeError> {
        let legs = parent.legs();
        let count = legs.len();
        if count == 0 {
            return Err(ShapeError::NonLinearTrail { index: 0 });
        }
        let start = start % count;

        let ordered: Vec<Leg> = match polarity {
            Polarity::Forward => (0..count)
                .map(|offset| legs[(start + offset) % count].clone())
                .collect(),
            Polarity::Backward => (0..count)
                .map(|offset| legs[(start + count - offset) % count].flipped())
                .collect(),
        };

        Ok(Self {
            start,
            polarity,
            line: Line::from_legs(ordered)?,
        })
    }

    /// Index of the parent leg this path starts with
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Which way the parent is traversed
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// The path's own line
    #[must_use]
    pub const fn line(&self) -> &Line {
        &self.line
    }
}

impl LegSequence for Path {
    fn legs(&self) -> &[Leg] {
        self.line.legs()
    }

    fn cys(&self) -> &[Currency] {
        self.line.cys()
    }
}

impl Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({:+}@{}, {:?})", self.polarity.sign(), self.start, self.line)
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}@{} {}", self.polarity.sign(), self.start, self.line)
    }
}
