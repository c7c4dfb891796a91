//! Domain state of the stock server.
//!
//! - `rate_tracker` — latest exchange rate per currency pair.
//! - `pipeline` — per-subscriber filter/convert/emit unit and its lifecycle.

pub mod pipeline;
pub mod rate_tracker;
