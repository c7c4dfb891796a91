//! Stock stream-combination server.
//!
//! The server consumes two upstream feeds (stock quotes and exchange rates) and
//! serves any number of subscribers, each receiving the quotes of its own symbols
//! converted with the latest known exchange rate.
//!
//! Building blocks, leaf first:
//! - `model::rate_tracker` — latest rate per currency pair.
//! - `joiner` — joins one quote with the rate state.
//! - `model::pipeline` — per-subscriber filter, join and emit.
//! - `engine` — synchronous engine establishing the single processing order.
//! - `server` — threaded orchestrator handing out `QuoteStream`s.
//! - `feed` — upstream feed adapters.
//! - `receiver` — TCP listener for downstream subscribers.
#![warn(missing_docs)]

pub mod engine;
pub mod feed;
pub mod joiner;
pub mod model;
pub mod receiver;
pub mod server;

pub use engine::StreamEngine;
pub use feed::{EventStreamClient, TcpEventStreamClient};
pub use joiner::{Conversion, ConversionJoiner};
pub use model::pipeline::{PipelineState, SubscriptionId, SubscriptionPipeline};
pub use model::rate_tracker::{RateEntry, RateTracker};
pub use receiver::SubscriptionListener;
pub use server::{QuoteStream, ServerConfig, StockServer};
