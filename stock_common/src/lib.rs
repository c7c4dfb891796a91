//!
//! Common types and utilities shared by the stock server, client and feed simulator.
//!
//! This crate aggregates:
//! - `error` — unified error type `StreamError` used across the workspace.
//! - `result` — handy `Result<T, StreamError>` alias.
//! - `quote` — `Quote` and `ConvertedQuote` records exchanged on every channel.
//! - `pair` — `CurrencyPair` codes such as `EUR/USD`.
//! - `codec` — `QuoteParser`, the line-oriented JSON event codec.
//! - `command` — `SubscriptionRequest` built from request parameters.
//! - `symbols` — symbol list parsing shared by client and feed simulator.
//! - `feed` — identifiers for the two upstream feeds.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod codec;
pub mod command;
pub mod error;
pub mod feed;
pub mod net;
pub mod pair;
pub mod quote;
pub mod result;
pub mod symbols;

pub use codec::QuoteParser;
pub use command::SubscriptionRequest;
pub use error::StreamError;
pub use feed::FeedKind;
pub use pair::CurrencyPair;
pub use quote::{ConvertedQuote, Quote};
pub use result::Result;
