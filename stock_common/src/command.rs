//! Subscription request sent by downstream clients.
//!
//! A request travels as a parameter map (`name -> list of values`), serialized as a
//! single JSON line. Only the `STOCK` parameter is understood; it names the stock
//! symbols the subscriber wants to see.
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::symbols::normalize_symbol;

/// Name of the parameter carrying the requested stock symbols.
pub const STOCK_PARAMETER: &str = "STOCK";

/// Raw request parameters as sent by a client.
pub type Parameters = HashMap<String, Vec<String>>;

/// Set of symbols a single subscriber asked for.
///
/// An empty set subscribes to nothing; there is no wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    symbols: HashSet<String>,
}

impl SubscriptionRequest {
    /// Build a request from symbol names, normalizing and de-duplicating them.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symbols = symbols
            .into_iter()
            .flat_map(|value| {
                value
                    .as_ref()
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter_map(normalize_symbol)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { symbols }
    }

    /// Extract the request from client parameters. Unknown keys are ignored.
    pub fn from_parameters(parameters: &Parameters) -> Self {
        parameters
            .get(STOCK_PARAMETER)
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Encode the request back into client parameters.
    pub fn to_parameters(&self) -> Parameters {
        let mut symbols: Vec<String> = self.symbols.iter().cloned().collect();
        symbols.sort();
        HashMap::from([(STOCK_PARAMETER.to_string(), symbols)])
    }

    /// Whether `symbol` is part of the request.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    /// Requested symbols.
    pub fn symbols(&self) -> &HashSet<String> {
        &self.symbols
    }

    /// `true` when the request names no symbol at all.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
