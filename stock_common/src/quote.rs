//! Quote records exchanged on the upstream feeds and the downstream streams.
//!
//! Both records share the same wire shape, `{"code": ..., "quote": ...}`, so a
//! stock price, an exchange rate and a converted price all look alike on the wire.
use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// A single observation from either upstream feed.
///
/// `symbol` is a ticker (`GOOGLE`) for stock events and a pair code (`EUR/USD`)
/// for forex events; nothing but the feed it arrived on tells the two apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Stock ticker or `BASE/QUOTE` currency pair code.
    #[serde(rename = "code")]
    pub symbol: String,
    /// Price or exchange rate.
    #[serde(rename = "quote")]
    pub value: f64,
}

impl Quote {
    /// Create a new quote.
    pub fn new(symbol: impl Into<String>, value: f64) -> Self {
        Self {
            symbol: symbol.into(),
            value,
        }
    }

    /// Encode the quote as one line of JSON (without the trailing newline).
    pub fn to_json(&self) -> Result<String, StreamError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A stock quote converted into the target currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedQuote {
    /// Original stock symbol.
    pub code: String,
    /// Price expressed in the target currency.
    pub quote: f64,
}

impl ConvertedQuote {
    /// Encode the converted quote as one line of JSON (without the trailing newline).
    pub fn to_json(&self) -> Result<String, StreamError> {
        Ok(serde_json::to_string(self)?)
    }
}
