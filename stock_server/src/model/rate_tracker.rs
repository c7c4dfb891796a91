//! Latest-rate state for every currency pair seen on the forex feed.
//!
//! The tracker keeps exactly one entry per pair. Every update overwrites the previous
//! value and is stamped with a sequence number that grows with each update, so the
//! entry always reflects the most recent write in processing order.
//!
//! The tracker is not synchronized; it is owned by the single dispatch loop and lent
//! to pipelines by reference for the duration of one dispatch step.

use std::collections::HashMap;

use stock_common::CurrencyPair;

/// The latest known rate for one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateEntry {
    /// Target-per-source exchange rate.
    pub rate: f64,
    /// Processing-order index of the update that set this rate.
    pub sequence: u64,
}

/// Holds the single latest rate for each currency pair.
#[derive(Debug, Default)]
pub struct RateTracker {
    rates: HashMap<CurrencyPair, RateEntry>,
    sequence: u64,
}

impl RateTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `rate` as the latest value for `pair` and return its sequence number.
    pub fn update(&mut self, pair: CurrencyPair, rate: f64) -> u64 {
        self.sequence += 1;
        let sequence = self.sequence;
        self.rates.insert(pair, RateEntry { rate, sequence });
        sequence
    }

    /// Latest rate recorded for `pair`, or `None` if the pair was never seen.
    pub fn current_rate(&self, pair: &CurrencyPair) -> Option<f64> {
        self.rates.get(pair).map(|entry| entry.rate)
    }

    /// Latest entry recorded for `pair`.
    pub fn entry(&self, pair: &CurrencyPair) -> Option<&RateEntry> {
        self.rates.get(pair)
    }

    /// Number of pairs with a known rate.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// `true` before the first update.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
