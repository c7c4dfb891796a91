//! Currency pair codes.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// Pair every subscription converts with unless configured otherwise.
pub const DEFAULT_PAIR: &str = "EUR/USD";

/// A `BASE/QUOTE` currency pair such as `EUR/USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    base: String,
    quote: String,
}

impl CurrencyPair {
    /// Build a pair from its two legs, validating and upper-casing both.
    pub fn new(base: &str, quote: &str) -> Result<Self, StreamError> {
        let invalid = || StreamError::InvalidPair(format!("{}/{}", base, quote));
        Ok(Self {
            base: normalize_leg(base).ok_or_else(invalid)?,
            quote: normalize_leg(quote).ok_or_else(invalid)?,
        })
    }

    /// Base currency (left leg).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Quote currency (right leg).
    pub fn quote(&self) -> &str {
        &self.quote
    }
}

fn normalize_leg(leg: &str) -> Option<String> {
    let leg = leg.trim();
    if leg.is_empty() || !leg.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(leg.to_ascii_uppercase())
}

impl Default for CurrencyPair {
    fn default() -> Self {
        Self {
            base: "EUR".to_string(),
            quote: "USD".to_string(),
        }
    }
}

impl FromStr for CurrencyPair {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((base, quote)) => Self::new(base, quote),
            None => Err(StreamError::InvalidPair(s.to_string())),
        }
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = StreamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.to_string()
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_pair_code() {
        let pair: CurrencyPair = " eur/usd ".parse().unwrap();
        assert_eq!(pair.base(), "EUR");
        assert_eq!(pair.quote(), "USD");
        assert_eq!(pair.to_string(), "EUR/USD");
    }

    #[test]
    fn default_pair_matches_constant() {
        assert_eq!(CurrencyPair::default().to_string(), DEFAULT_PAIR);
        assert_eq!(DEFAULT_PAIR.parse::<CurrencyPair>().unwrap(), CurrencyPair::default());
    }

    #[test]
    fn rejects_codes_that_are_not_pairs() {
        for code in ["EURUSD", "EUR/", "/USD", "EUR/US1", "GOOGLE", ""] {
            assert!(
                matches!(code.parse::<CurrencyPair>(), Err(StreamError::InvalidPair(_))),
                "{code} should not parse"
            );
        }
    }
}
