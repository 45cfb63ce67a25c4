//! Market snapshots stored as JSON.
//!
//! A snapshot is what venue adapters produced at one point in time:
//!
//! ```json
//! {
//!   "markets": { "binance": { "BTC/USDT": { "base": "BTC", "quote": "USDT" }, "ETH/BTC": null } },
//!   "tickers": { "binance": { "BTC/USDT": { "last": 64000.0 } } }
//! }
//! ```
//!
//! `tickers` may be left out, in which case every listed market counts as live.

use std::fs;
use std::path::Path;

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::arb::normalize::{MarketCatalogue, TickerCatalogue};

/// Markets and tickers of every venue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// venue -> symbol -> market descriptor (or null)
    pub markets: MarketCatalogue,
    /// venue -> symbol -> ticker
    #[serde(default)]
    pub tickers: TickerCatalogue,
}

impl Snapshot {
    /// Reads and parses a snapshot file.
    ///
    /// # Errors
    /// * If the file cannot be read
    /// * If its content is not a valid snapshot
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json(&json).wrap_err_with(|| format!("Invalid snapshot {}", path.display()))
    }

    /// Parses a snapshot from a JSON string.
    ///
    /// # Errors
    /// * If `json` is not a valid snapshot
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).wrap_err("Failed to parse snapshot")
    }

    /// Number of markets listed across all venues
    #[must_use]
    pub fn market_count(&self) -> usize {
        self.markets.values().map(|symbols| symbols.len()).sum()
    }
}
