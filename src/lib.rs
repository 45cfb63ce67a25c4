/*!
 * # Shapes - Cross-Venue Currency Cycle Discovery
 *
 * Shapes finds closed cycles of markets across exchanges: sequences of trades that
 * start and end in the same currency, possibly hopping between venues on the way.
 * Pricing and execution are left to the caller; this crate only works out which
 * cycles exist and every way of walking them.
 *
 * ## Module Structure
 *
 * - `arb`: Normalization, ranking, graph building and cycle search
 * - `config`: Search settings from the environment
 * - `snapshot`: JSON market snapshots
 * - `utils`: Utility functions and helpers
 */

/// Cycle discovery
pub mod arb;
/// Search settings from the environment
pub mod config;
/// JSON market snapshots
pub mod snapshot;
/// Utility functions and helpers
pub mod utils;
