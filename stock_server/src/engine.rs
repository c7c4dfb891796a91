//! Synchronous stream-combination engine.
//!
//! `StreamEngine` owns the rate state and the registry of active pipelines. Each
//! call processes one event to completion, so the order in which calls are made is
//! the single total order shared by both feeds. The engine never blocks: parsing,
//! a map update or a fan-out over in-memory channels is all it does.

use std::collections::BTreeMap;

use crossbeam_channel::Sender;
use log::{debug, info, warn};
use stock_common::{ConvertedQuote, CurrencyPair, FeedKind, QuoteParser, SubscriptionRequest};

use crate::model::pipeline::{Delivery, SubscriptionId, SubscriptionPipeline};
use crate::model::rate_tracker::RateTracker;

/// Rate state plus the registry of active subscriptions.
pub struct StreamEngine {
    rates: RateTracker,
    pipelines: BTreeMap<SubscriptionId, SubscriptionPipeline>,
    pair: CurrencyPair,
    next_id: SubscriptionId,
    terminated: bool,
}

impl StreamEngine {
    /// Create an engine converting every subscription with `pair`.
    pub fn new(pair: CurrencyPair) -> Self {
        Self {
            rates: RateTracker::new(),
            pipelines: BTreeMap::new(),
            pair,
            next_id: 1,
            terminated: false,
        }
    }

    /// Route a raw event from `kind` to the matching handler.
    pub fn on_event(&mut self, kind: FeedKind, raw: &str) {
        match kind {
            FeedKind::Stock => self.on_stock_event(raw),
            FeedKind::Forex => self.on_forex_event(raw),
        }
    }

    /// Apply a forex event to the rate state. Malformed events are logged and dropped.
    pub fn on_forex_event(&mut self, raw: &str) {
        match QuoteParser::parse_rate(raw) {
            Ok((pair, rate)) => {
                let sequence = self.rates.update(pair.clone(), rate);
                debug!("Rate {} = {} (update #{})", pair, rate, sequence);
            }
            Err(e) => warn!("Dropping forex event: {}", e),
        }
    }

    /// Offer a stock event to every active pipeline. Malformed events are logged and dropped.
    pub fn on_stock_event(&mut self, raw: &str) {
        let quote = match QuoteParser::parse(raw) {
            Ok(quote) => quote,
            Err(e) => {
                warn!("Dropping stock event: {}", e);
                return;
            }
        };

        let rates = &self.rates;
        self.pipelines.retain(|id, pipeline| {
            if pipeline.on_quote(&quote, rates) == Delivery::Closed {
                info!("Subscription {} closed by its consumer", id);
                false
            } else {
                true
            }
        });
    }

    /// Register a new pipeline that will see every stock event processed from now on.
    ///
    /// Once the engine is terminated the pipeline is created already cancelled, so the
    /// returned subscription's stream ends straight away.
    pub fn subscribe(
        &mut self,
        request: SubscriptionRequest,
        sink: Sender<ConvertedQuote>,
    ) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;

        let mut pipeline = SubscriptionPipeline::new(id, request, self.pair.clone(), sink);
        if self.terminated {
            pipeline.cancel();
            info!("Subscription {} refused: upstream feed terminated", id);
            return id;
        }
        info!(
            "Subscription {} registered for {:?}",
            id,
            pipeline.request().symbols()
        );
        self.pipelines.insert(id, pipeline);
        id
    }

    /// Cancel and unregister a subscription. Returns `false` if it was not active.
    pub fn cancel(&mut self, id: SubscriptionId) -> bool {
        match self.pipelines.remove(&id) {
            Some(mut pipeline) => {
                pipeline.cancel();
                info!("Subscription {} cancelled", id);
                true
            }
            None => false,
        }
    }

    /// React to the end of an upstream feed: every active stream ends and no new
    /// subscription will be served.
    pub fn terminate(&mut self, kind: FeedKind) {
        if !self.terminated {
            warn!(
                "Upstream {} feed terminated, closing {} subscription(s)",
                kind,
                self.pipelines.len()
            );
        }
        self.terminated = true;
        for (_, mut pipeline) in std::mem::take(&mut self.pipelines) {
            pipeline.cancel();
        }
    }

    /// Number of active subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.pipelines.len()
    }

    /// Whether an upstream feed has terminated.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Current rate state.
    pub fn rates(&self) -> &RateTracker {
        &self.rates
    }

    /// Pair used for conversions.
    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{Receiver, unbounded};
    use stock_common::Quote;

    fn event(symbol: &str, value: f64) -> String {
        Quote::new(symbol, value).to_json().unwrap()
    }

    fn subscribe(engine: &mut StreamEngine, symbols: &[&str]) -> (SubscriptionId, Receiver<ConvertedQuote>) {
        let (tx, rx) = unbounded();
        let id = engine.subscribe(SubscriptionRequest::new(symbols), tx);
        (id, rx)
    }

    fn drain(rx: &Receiver<ConvertedQuote>) -> Vec<ConvertedQuote> {
        rx.try_iter().collect()
    }

    fn engine() -> StreamEngine {
        StreamEngine::new(CurrencyPair::default())
    }

    #[test]
    fn filters_quotes_for_requested_stock() {
        let mut engine = engine();
        engine.on_forex_event(&event("EUR/USD", 1.0));
        let (_, rx) = subscribe(&mut engine, &["GOOGLE"]);

        engine.on_stock_event(&event("GOOGLE", 705.8673));
        engine.on_forex_event(&event("EUR/USD", 1.0));
        engine.on_stock_event(&event("APPLE", 98.18));

        let events = drain(&rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].code, "GOOGLE");
        assert!((events[0].quote - 705.8673).abs() < 1e-9);
    }

    #[test]
    fn matches_symbols_regardless_of_case() {
        let mut engine = engine();
        engine.on_forex_event(&event("EUR/USD", 1.0));
        let (_, lower) = subscribe(&mut engine, &["brk.b"]);
        let (_, mixed) = subscribe(&mut engine, &["Brk.B"]);

        engine.on_stock_event(&event("brk.b", 10.0));
        engine.on_stock_event(&event("BRK.B", 20.0));

        for rx in [&lower, &mixed] {
            let events = drain(rx);
            assert_eq!(events.len(), 2);
            assert!(events.iter().all(|q| q.code == "BRK.B"));
            assert!((events[0].quote - 10.0).abs() < 1e-9);
            assert!((events[1].quote - 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn quote_before_any_rate_is_suppressed_not_replayed() {
        let mut engine = engine();
        let (_, rx) = subscribe(&mut engine, &["GOOGLE"]);

        engine.on_stock_event(&event("GOOGLE", 1300.0));
        engine.on_forex_event(&event("EUR/USD", 1.3));
        engine.on_forex_event(&event("EUR/USD", 1.4));

        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn converts_with_rate_observed_before_the_quote() {
        let mut engine = engine();
        let (_, rx) = subscribe(&mut engine, &["GOOGLE"]);

        engine.on_forex_event(&event("EUR/USD", 1.3));
        engine.on_stock_event(&event("GOOGLE", 1300.0));

        let events = drain(&rx);
        assert_eq!(events.len(), 1);
        assert!((events[0].quote - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn uses_latest_known_rate() {
        let mut engine = engine();
        let (_, rx) = subscribe(&mut engine, &["GOOGLE"]);

        engine.on_forex_event(&event("EUR/USD", 1.3));
        engine.on_forex_event(&event("EUR/USD", 1.4));
        engine.on_stock_event(&event("GOOGLE", 1400.0));

        let events = drain(&rx);
        assert_eq!(events.len(), 1);
        assert!((events[0].quote - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn other_pairs_do_not_affect_conversion() {
        let mut engine = engine();
        let (_, rx) = subscribe(&mut engine, &["GOOGLE"]);

        engine.on_forex_event(&event("EUR/USD", 2.0));
        engine.on_forex_event(&event("GBP/USD", 4.0));
        engine.on_stock_event(&event("GOOGLE", 100.0));

        let events = drain(&rx);
        assert_eq!(events.len(), 1);
        assert!((events[0].quote - 50.0).abs() < 1e-9);
    }

    #[test]
    fn subscriptions_receive_only_their_own_symbols() {
        let mut engine = engine();
        engine.on_forex_event(&event("EUR/USD", 1.0));
        let (_, google) = subscribe(&mut engine, &["GOOGLE"]);
        let (_, tech) = subscribe(&mut engine, &["APPLE", "MSFT"]);

        for (symbol, price) in [("GOOGLE", 1.0), ("APPLE", 2.0), ("MSFT", 3.0), ("IBM", 4.0)] {
            engine.on_stock_event(&event(symbol, price));
        }

        let google: Vec<String> = drain(&google).into_iter().map(|q| q.code).collect();
        let tech: Vec<String> = drain(&tech).into_iter().map(|q| q.code).collect();
        assert_eq!(google, vec!["GOOGLE"]);
        assert_eq!(tech, vec!["APPLE", "MSFT"]);
    }

    #[test]
    fn malformed_events_are_dropped_and_processing_continues() {
        let mut engine = engine();
        let (_, rx) = subscribe(&mut engine, &["GOOGLE"]);

        engine.on_forex_event("garbage");
        engine.on_forex_event(&event("GOOGLE", 1.3));
        assert!(engine.rates().is_empty());

        engine.on_forex_event(&event("EUR/USD", 2.0));
        engine.on_stock_event("{\"code\":\"GOOGLE\"}");
        engine.on_stock_event(&event("GOOGLE", 10.0));

        let events = drain(&rx);
        assert_eq!(events.len(), 1);
        assert!((events[0].quote - 5.0).abs() < 1e-9);
    }

    #[test]
    fn cancelled_subscription_stops_receiving() {
        let mut engine = engine();
        engine.on_forex_event(&event("EUR/USD", 1.0));
        let (id, rx) = subscribe(&mut engine, &["GOOGLE"]);

        engine.on_stock_event(&event("GOOGLE", 1.0));
        assert!(engine.cancel(id));
        assert!(!engine.cancel(id));
        engine.on_stock_event(&event("GOOGLE", 2.0));

        assert_eq!(drain(&rx).len(), 1);
        assert!(rx.recv().is_err());
        assert_eq!(engine.active_subscriptions(), 0);
    }

    #[test]
    fn dropped_consumer_is_unregistered_on_next_emission() {
        let mut engine = engine();
        engine.on_forex_event(&event("EUR/USD", 1.0));
        let (_, rx) = subscribe(&mut engine, &["GOOGLE"]);
        drop(rx);

        engine.on_stock_event(&event("GOOGLE", 1.0));
        assert_eq!(engine.active_subscriptions(), 0);
    }

    #[test]
    fn resubscribing_does_not_replay_missed_quotes() {
        let mut engine = engine();
        engine.on_forex_event(&event("EUR/USD", 1.0));
        let (first, _) = subscribe(&mut engine, &["GOOGLE"]);
        engine.on_stock_event(&event("GOOGLE", 1.0));
        engine.cancel(first);

        let (second, rx) = subscribe(&mut engine, &["GOOGLE"]);
        assert_ne!(first, second);
        assert!(drain(&rx).is_empty());
        engine.on_stock_event(&event("GOOGLE", 2.0));
        assert_eq!(drain(&rx).len(), 1);
    }

    #[test]
    fn feed_termination_ends_every_stream() {
        let mut engine = engine();
        let (_, first) = subscribe(&mut engine, &["GOOGLE"]);
        let (_, second) = subscribe(&mut engine, &["APPLE"]);

        engine.terminate(FeedKind::Forex);

        assert!(engine.is_terminated());
        assert_eq!(engine.active_subscriptions(), 0);
        assert!(first.recv().is_err());
        assert!(second.recv().is_err());

        let (_, late) = subscribe(&mut engine, &["GOOGLE"]);
        assert!(late.recv().is_err());
        assert_eq!(engine.active_subscriptions(), 0);
    }

    #[test]
    fn routes_events_by_feed_kind() {
        let mut engine = engine();
        let (_, rx) = subscribe(&mut engine, &["GOOGLE"]);

        engine.on_event(FeedKind::Forex, &event("EUR/USD", 2.0));
        engine.on_event(FeedKind::Stock, &event("GOOGLE", 4.0));

        assert_eq!(engine.rates().current_rate(engine.pair()), Some(2.0));
        assert_eq!(drain(&rx).len(), 1);
    }
}
