//! Per-subscriber view of the stock feed.
//!
//! A `SubscriptionPipeline` filters quotes by the subscriber's symbols, joins the
//! matching ones with the latest rate and pushes the result into the subscriber's
//! sink. It owns nothing shared: the rate state is lent to it on every call.
//!
//! Lifecycle: a pipeline starts `Active` and moves to `Cancelled` either on explicit
//! cancellation or when its sink's receiving side is gone. `Cancelled` is terminal;
//! the sink is dropped on the transition, which ends the subscriber's stream.

use crossbeam_channel::Sender;
use stock_common::{ConvertedQuote, CurrencyPair, Quote, SubscriptionRequest};

use crate::joiner::{Conversion, ConversionJoiner};
use crate::model::rate_tracker::RateTracker;

/// Identifier of a registered subscription.
pub type SubscriptionId = u64;

/// Lifecycle state of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Receiving quotes and emitting conversions.
    Active,
    /// Terminal; nothing is processed any more.
    Cancelled,
}

/// What happened to a quote offered to a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// A converted quote was pushed to the sink.
    Emitted,
    /// The symbol is not part of the subscription.
    Filtered,
    /// No usable rate yet.
    Suppressed,
    /// The pipeline is cancelled and must be unregistered.
    Closed,
}

/// One subscriber's filtered, converted view of the stock feed.
pub struct SubscriptionPipeline {
    id: SubscriptionId,
    request: SubscriptionRequest,
    pair: CurrencyPair,
    sink: Option<Sender<ConvertedQuote>>,
}

impl SubscriptionPipeline {
    /// Create an active pipeline converting with `pair` and emitting into `sink`.
    pub fn new(
        id: SubscriptionId,
        request: SubscriptionRequest,
        pair: CurrencyPair,
        sink: Sender<ConvertedQuote>,
    ) -> Self {
        Self {
            id,
            request,
            pair,
            sink: Some(sink),
        }
    }

    /// Identifier assigned at registration.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Symbols this pipeline lets through.
    pub fn request(&self) -> &SubscriptionRequest {
        &self.request
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        if self.sink.is_some() {
            PipelineState::Active
        } else {
            PipelineState::Cancelled
        }
    }

    /// Filter, join and emit a freshly parsed stock quote.
    pub fn on_quote(&mut self, quote: &Quote, rates: &RateTracker) -> Delivery {
        let Some(sink) = &self.sink else {
            return Delivery::Closed;
        };
        if !self.request.contains(&quote.symbol) {
            return Delivery::Filtered;
        }

        match ConversionJoiner::convert(quote, rates, &self.pair) {
            Conversion::Suppressed => Delivery::Suppressed,
            Conversion::Converted(converted) => {
                if sink.send(converted).is_ok() {
                    Delivery::Emitted
                } else {
                    self.cancel();
                    Delivery::Closed
                }
            }
        }
    }

    /// Move to `Cancelled` and release the sink.
    pub fn cancel(&mut self) {
        self.sink = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn pipeline(symbols: &[&str]) -> (SubscriptionPipeline, crossbeam_channel::Receiver<ConvertedQuote>) {
        let (tx, rx) = unbounded();
        let pipeline = SubscriptionPipeline::new(
            1,
            SubscriptionRequest::new(symbols),
            CurrencyPair::default(),
            tx,
        );
        (pipeline, rx)
    }

    fn rates(rate: f64) -> RateTracker {
        let mut rates = RateTracker::new();
        rates.update(CurrencyPair::default(), rate);
        rates
    }

    #[test]
    fn filters_unrequested_symbols() {
        let (mut pipeline, rx) = pipeline(&["GOOGLE"]);
        let delivery = pipeline.on_quote(&Quote::new("APPLE", 98.18), &rates(1.0));
        assert_eq!(delivery, Delivery::Filtered);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn suppresses_without_rate() {
        let (mut pipeline, rx) = pipeline(&["GOOGLE"]);
        let delivery = pipeline.on_quote(&Quote::new("GOOGLE", 1300.0), &RateTracker::new());
        assert_eq!(delivery, Delivery::Suppressed);
        assert!(rx.try_recv().is_err());
        assert_eq!(pipeline.state(), PipelineState::Active);
    }

    #[test]
    fn emits_converted_quote() {
        let (mut pipeline, rx) = pipeline(&["GOOGLE"]);
        let delivery = pipeline.on_quote(&Quote::new("GOOGLE", 1300.0), &rates(1.3));
        assert_eq!(delivery, Delivery::Emitted);

        let converted = rx.try_recv().unwrap();
        assert_eq!(converted.code, "GOOGLE");
        assert!((converted.quote - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn empty_request_never_emits() {
        let (mut pipeline, rx) = pipeline(&[]);
        for symbol in ["GOOGLE", "APPLE", ""] {
            assert_eq!(pipeline.on_quote(&Quote::new(symbol, 10.0), &rates(1.0)), Delivery::Filtered);
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cancel_is_terminal_and_ends_the_stream() {
        let (mut pipeline, rx) = pipeline(&["GOOGLE"]);
        pipeline.cancel();

        assert_eq!(pipeline.state(), PipelineState::Cancelled);
        assert_eq!(pipeline.on_quote(&Quote::new("GOOGLE", 1300.0), &rates(1.3)), Delivery::Closed);
        assert!(rx.recv().is_err());
    }

    #[test]
    fn dropped_receiver_cancels_pipeline() {
        let (mut pipeline, rx) = pipeline(&["GOOGLE"]);
        drop(rx);

        assert_eq!(pipeline.on_quote(&Quote::new("GOOGLE", 1300.0), &rates(1.3)), Delivery::Closed);
        assert_eq!(pipeline.state(), PipelineState::Cancelled);
    }
}
