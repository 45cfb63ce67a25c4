//! Backtracking search for shapes.
//!
//! Every market starts a trail spending its base. A trail grows along graph edges whose
//! direction matches the way the trail left its last market, so it only ever moves forward
//! in rank order and meets each market at most once. A trail that closes at a requested
//! length is recorded and not extended; one that closes early is dropped.
//!
//! The work is exponential in graph degree times depth in the worst case. The venue cap and
//! the stop-on-close rule are what keeps it tractable on real catalogues.
//!
//! Since edges only run forward in rank and every trail starts by spending its base, cycles
//! of four or more markets are only found when the rank happens to line up with them; a
//! plain square such as BTC/USDT, ETH/BTC, ETH/EUR, USDT/EUR yields none.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Instant;

use log::{debug, info};

use super::error::ShapeError;
use super::graph::SymbolGraph;
use super::leg::{Direction, Leg};
use super::normalize::{markets, normalize, MarketCatalogue, TickerCatalogue};
use super::rank::Ranker;
use super::shape::Shape;
use super::types::Currency;

/// One step of a trail: a market (by rank position) and the way it is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Rank position of the market in the graph
    pub position: usize,
    /// Which way the market is traversed
    pub direction: Direction,
}

/// A partial or complete walk through the graph. Extending a trail copies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail {
    /// Steps in walk order, never empty
    steps: Vec<Step>,
}

impl Trail {
    /// A trail of a single step spending the market's base
    #[must_use]
    pub fn start(position: usize) -> Self {
        Self {
            steps: vec![Step {
                position,
                direction: Direction::BaseToQuote,
            }],
        }
    }

    /// A copy of this trail with `step` appended
    #[must_use]
    pub fn extended(&self, step: Step) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step);
        Self { steps }
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: a trail has at least its starting step
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in walk order
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn first(&self) -> Step {
        self.steps[0]
    }

    fn last(&self) -> Step {
        self.steps[self.steps.len() - 1]
    }
}

/// Parameters of one search over a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Requested shape lengths, each at least 2
    lengths: BTreeSet<usize>,
    /// Maximum number of distinct venues a shape may span
    max_unique_venues: Option<usize>,
}

impl SearchOptions {
    /// Validates the requested lengths.
    ///
    /// # Errors
    ///
    /// `InvalidLength` if any length is below 2, or (with length 0) if none is given.
    pub fn new(lengths: &[usize], max_unique_venues: Option<usize>) -> Result<Self, ShapeError> {
        if lengths.is_empty() {
            return Err(ShapeError::InvalidLength { length: 0 });
        }
        if let Some(&length) = lengths.iter().find(|&&length| length < 2) {
            return Err(ShapeError::InvalidLength { length });
        }
        Ok(Self {
            lengths: lengths.iter().copied().collect(),
            max_unique_venues,
        })
    }

    /// Requested lengths in ascending order
    #[must_use]
    pub const fn lengths(&self) -> &BTreeSet<usize> {
        &self.lengths
    }

    /// Venue cap, if any
    #[must_use]
    pub const fn max_unique_venues(&self) -> Option<usize> {
        self.max_unique_venues
    }

    fn max_length(&self) -> usize {
        self.lengths.last().copied().unwrap_or_default()
    }
}

/// Shapes found, keyed by length
pub type ShapesByLength = BTreeMap<usize, Vec<Shape>>;

/// Closed trails found, keyed by length
type TrailsByLength = BTreeMap<usize, Vec<Trail>>;

/// Normalizes the catalogues, ranks the markets and builds the symbol graph.
#[must_use]
pub fn build_graph(
    markets_by_venue: &MarketCatalogue,
    tickers_by_venue: &TickerCatalogue,
) -> SymbolGraph {
    let normalized = normalize(markets_by_venue, tickers_by_venue);
    let markets = markets(&normalized);
    let ranker = Ranker::new(&markets);
    SymbolGraph::build(ranker.rank(markets))
}

/// Finds every shape of the requested lengths across the given venues.
///
/// Every requested length is present in the result, possibly with no shapes. Within a
/// length, shapes come in rank order of the market their trail started from.
///
/// # Errors
///
/// `InvalidLength` if a length is below 2 or none is requested. Nothing is searched then.
pub fn find_shapes(
    lengths: &[usize],
    markets_by_venue: &MarketCatalogue,
    tickers_by_venue: &TickerCatalogue,
    max_unique_venues: Option<usize>,
) -> Result<ShapesByLength, ShapeError> {
    let options = SearchOptions::new(lengths, max_unique_venues)?;
    let graph = build_graph(markets_by_venue, tickers_by_venue);
    find_shapes_in_graph(&graph, &options)
}

/// Single-length form of [`find_shapes`], returning a flat list.
///
/// # Errors
///
/// `InvalidLength` if `length` is below 2.
pub fn find_shapes_of_length(
    length: usize,
    markets_by_venue: &MarketCatalogue,
    tickers_by_venue: &TickerCatalogue,
    max_unique_venues: Option<usize>,
) -> Result<Vec<Shape>, ShapeError> {
    let mut shapes = find_shapes(&[length], markets_by_venue, tickers_by_venue, max_unique_venues)?;
    Ok(shapes.remove(&length).unwrap_or_default())
}

/// Runs the search over an already built graph.
///
/// # Errors
///
/// Propagates shape construction errors, which trails found by the search do not produce.
pub fn find_shapes_in_graph(
    graph: &SymbolGraph,
    options: &SearchOptions,
) -> Result<ShapesByLength, ShapeError> {
    let started = Instant::now();
    let search = Search { graph, options };

    let mut trails: TrailsByLength = options
        .lengths()
        .iter()
        .map(|&length| (length, Vec::new()))
        .collect();
    for position in 0..graph.len() {
        search.extend(&Trail::start(position), &mut trails);
    }

    let mut shapes = ShapesByLength::new();
    for (length, trails) in trails {
        let found = trails
            .iter()
            .map(|trail| search.shape(trail))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Found {} shapes of length {length}", found.len());
        shapes.insert(length, found);
    }

    info!(
        "Found {} shapes over {} markets in {:?}",
        shapes.values().map(Vec::len).sum::<usize>(),
        graph.len(),
        started.elapsed()
    );
    Ok(shapes)
}

/// A search over one graph with one set of options
struct Search<'a> {
    /// The graph being walked
    graph: &'a SymbolGraph,
    /// Lengths and venue cap
    options: &'a SearchOptions,
}

impl Search<'_> {
    fn source(&self, step: Step) -> Option<&Currency> {
        self.graph
            .market(step.position)
            .and_then(|market| market.pair.as_ref())
            .map(|pair| step.direction.source_in(pair))
    }

    fn target(&self, step: Step) -> Option<&Currency> {
        self.graph
            .market(step.position)
            .and_then(|market| market.pair.as_ref())
            .map(|pair| step.direction.target_in(pair))
    }

    /// Whether the trail receives, at its end, what it spends at its start
    fn is_circular(&self, trail: &Trail) -> bool {
        match (self.target(trail.last()), self.source(trail.first())) {
            (Some(target), Some(source)) => target == source,
            _ => false,
        }
    }

    fn venues(&self, trail: &Trail) -> HashSet<&str> {
        trail
            .steps()
            .iter()
            .filter_map(|step| self.graph.market(step.position))
            .map(|market| market.venue())
            .collect()
    }

    /// Grows `trail` by every edge leaving its last market, recording closed trails of a
    /// requested length into `found` and recursing into open ones below the maximum length.
    fn extend(&self, trail: &Trail, found: &mut TrailsByLength) {
        let last = trail.last();
        let Some(target) = self.target(last) else {
            return;
        };

        let venues = self.venues(trail);
        let capped = self
            .options
            .max_unique_venues()
            .is_some_and(|cap| venues.len() >= cap);

        for edge in self.graph.edges(last.position) {
            if edge.direction != last.direction {
                continue;
            }
            let Some(next) = self.graph.market(edge.to) else {
                continue;
            };
            if capped && !venues.contains(next.venue()) {
                continue;
            }
            let Some(direction) = Leg::entering(next, target) else {
                continue;
            };

            let extended = trail.extended(Step {
                position: edge.to,
                direction,
            });
            let circular = self.is_circular(&extended);

            if circular {
                if let Some(closed) = found.get_mut(&extended.len()) {
                    closed.push(extended);
                }
            } else if extended.len() < self.options.max_length() {
                self.extend(&extended, found);
            }
        }
    }

    /// Turns a closed trail into a shape, reversed into ascending rank order with every leg
    /// flipped so it still chains.
    fn shape(&self, trail: &Trail) -> Result<Shape, ShapeError> {
        let legs = trail
            .steps()
            .iter()
            .rev()
            .enumerate()
            .map(|(index, step)| {
                self.graph
                    .market(step.position)
                    .map(|market| Leg::new(market.clone(), step.direction.flipped()))
                    .ok_or(ShapeError::NonLinearTrail { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Shape::from_legs(legs)
    }
}
