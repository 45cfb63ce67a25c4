//! Search settings read from the environment.
//!
//! A `.env` file in the working directory is loaded first, so settings can live next to the
//! snapshots they apply to. Command-line flags take precedence over anything read here.

use std::env;

use dotenv::dotenv;
use eyre::{Result, WrapErr};

/// Environment variable holding the comma separated shape lengths
pub const LENGTHS_VAR: &str = "SHAPES_LENGTHS";
/// Environment variable holding the venue cap
pub const MAX_VENUES_VAR: &str = "SHAPES_MAX_VENUES";

/// Shape length searched when nothing else is configured
pub const DEFAULT_LENGTH: usize = 3;

/// Search settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Shape lengths to search for
    pub lengths: Vec<usize>,
    /// Maximum number of venues a shape may span, unbounded when `None`
    pub max_unique_venues: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lengths: vec![DEFAULT_LENGTH],
            max_unique_venues: None,
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads `SHAPES_LENGTHS` and `SHAPES_MAX_VENUES`.
    ///
    /// # Errors
    /// * If either variable is set but is not a valid number (list)
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_values(
            env::var(LENGTHS_VAR).ok().as_deref(),
            env::var(MAX_VENUES_VAR).ok().as_deref(),
        )
    }

    /// Builds the settings from raw variable values. Blank values count as unset.
    ///
    /// # Errors
    /// * If a value is not a valid number (list)
    pub fn from_values(lengths: Option<&str>, max_venues: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(lengths) = lengths.map(str::trim).filter(|value| !value.is_empty()) {
            config.lengths = lengths
                .split(',')
                .map(|length| length.trim().parse::<usize>())
                .collect::<Result<Vec<usize>, _>>()
                .wrap_err_with(|| {
                    format!(
                        "{LENGTHS_VAR} must be a comma separated list of numbers, got {lengths:?}"
                    )
                })?;
        }

        if let Some(max_venues) = max_venues.map(str::trim).filter(|value| !value.is_empty()) {
            config.max_unique_venues = Some(
                max_venues
                    .parse::<usize>()
                    .wrap_err_with(|| {
                        format!("{MAX_VENUES_VAR} must be a number, got {max_venues:?}")
                    })?,
            );
        }

        Ok(config)
    }

    /// Replaces settings with the ones given on the command line, where given.
    #[must_use]
    pub fn overridden(mut self, lengths: &[usize], max_unique_venues: Option<usize>) -> Self {
        if !lengths.is_empty() {
            self.lengths = lengths.to_vec();
        }
        if max_unique_venues.is_some() {
            self.max_unique_venues = max_unique_venues;
        }
        self
    }
}
