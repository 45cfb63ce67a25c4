//! Canonical order over markets.
//!
//! Graph edges only ever point from an earlier market to a later one, so the order decides
//! which of two connected markets owns the edge and in which orientation a cycle is found.
//! Markets whose base is itself used as a quote somewhere (BTC/USDT, ETH/BTC) rank high and
//! are walked first; markets that only ever meet the pure quote currencies (stables, majors)
//! through their quote side drift towards the end of the processing order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::types::{Currency, CurrencyPair, Market};

/// Orders markets by how their currencies relate to each other across the whole snapshot.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    /// quote -> every base observed against it
    bases_by_quote: BTreeMap<Currency, BTreeSet<Currency>>,
}

impl Ranker {
    /// Collects the bases observed against every quote across `markets`.
    #[must_use]
    pub fn new(markets: &[Market]) -> Self {
        let mut bases_by_quote: BTreeMap<Currency, BTreeSet<Currency>> = BTreeMap::new();
        for pair in markets.iter().filter_map(|market| market.pair.as_ref()) {
            bases_by_quote
                .entry(pair.quote.clone())
                .or_default()
                .insert(pair.base.clone());
        }
        Self { bases_by_quote }
    }

    /// Whether `currency` is the quote of at least one market
    #[must_use]
    pub fn is_quote(&self, currency: &str) -> bool {
        self.bases_by_quote.contains_key(currency)
    }

    /// Whether `base` was observed as a base against `quote`
    fn quoted_in(&self, base: &str, quote: &str) -> bool {
        self.bases_by_quote
            .get(quote)
            .is_some_and(|bases| bases.contains(base))
    }

    /// Compares two markets. `Less` means `market` ranks below `other`.
    ///
    /// The cascade stops at the first check that tells the two apart:
    /// unresolved markets rank lowest; then a market whose base is also a quote ranks
    /// above one whose base is not; then four cross-membership checks, where the side
    /// whose currency is quoted in the other's ranks lower. Markets nothing tells apart
    /// compare `Equal`.
    #[must_use]
    pub fn compare(&self, market: &Market, other: &Market) -> Ordering {
        let (a, b) = match (&market.pair, &other.pair) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) => (a, b),
        };

        // Bases that are also quotes go first on purpose: the reverse leaves the closing
        // leg of most triangles pointing the wrong way.
        match (self.is_quote(&a.base), self.is_quote(&b.base)) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }

        self.membership_checks(a, b)
            .into_iter()
            .find_map(|(mine, theirs)| match (mine, theirs) {
                (true, false) => Some(Ordering::Less),
                (false, true) => Some(Ordering::Greater),
                _ => None,
            })
            .unwrap_or(Ordering::Equal)
    }

    fn membership_checks(&self, a: &CurrencyPair, b: &CurrencyPair) -> [(bool, bool); 4] {
        [
            (self.quoted_in(&a.base, &b.base), self.quoted_in(&b.base, &a.base)),
            (self.quoted_in(&a.quote, &b.base), self.quoted_in(&b.quote, &a.base)),
            (self.quoted_in(&a.quote, &b.quote), self.quoted_in(&b.quote, &a.quote)),
            (self.quoted_in(&a.base, &b.quote), self.quoted_in(&b.base, &a.quote)),
        ]
    }

    /// Sorts markets from highest to lowest rank.
    ///
    /// Markets are first put in venue/symbol order so that ties do not depend on the order
    /// the snapshot was assembled in. The cascade is not guaranteed to be transitive, so
    /// the sort is a stable merge sort that tolerates inconsistent answers instead of the
    /// standard library sort.
    #[must_use]
    pub fn rank(&self, mut markets: Vec<Market>) -> Vec<Market> {
        markets.sort_by(|a, b| a.key.cmp(&b.key));
        merge_sort_by(markets, &|a: &Market, b: &Market| self.compare(b, a))
    }
}

/// Stable top-down merge sort. Takes from the right run only when it is strictly `Less`.
fn merge_sort_by<T, F>(mut items: Vec<T>, compare: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, compare);
    let right = merge_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = if compare(r, l) == Ordering::Less {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
