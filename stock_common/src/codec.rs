//! Line-oriented JSON codec for upstream feed events.
//!
//! Every raw event is one line holding `{"code": ..., "quote": ...}`. Feeds relayed
//! from a Server-Sent-Events source may still carry the `data:` field prefix, which
//! is stripped before decoding.
use crate::error::StreamError;
use crate::pair::CurrencyPair;
use crate::quote::Quote;
use crate::symbols::normalize_symbol;

const SSE_DATA_PREFIX: &str = "data:";

/// Stateless decoder from raw feed lines to `Quote` values.
pub struct QuoteParser;

impl QuoteParser {
    /// Decode a raw event into a `Quote`.
    ///
    /// The code is trimmed and upper-cased the same way requested symbols are.
    ///
    /// Fails with `StreamError::MalformedEvent` when the line is empty, is not the
    /// expected JSON object, has a blank code, or carries a non-finite value.
    pub fn parse(raw: &str) -> Result<Quote, StreamError> {
        let payload = raw.trim();
        let payload = payload
            .strip_prefix(SSE_DATA_PREFIX)
            .map(str::trim_start)
            .unwrap_or(payload);
        if payload.is_empty() {
            return Err(StreamError::MalformedEvent("empty event".to_string()));
        }

        let mut quote: Quote = serde_json::from_str(payload)
            .map_err(|e| StreamError::MalformedEvent(format!("{}: {}", e, payload)))?;

        quote.symbol = normalize_symbol(&quote.symbol)
            .ok_or_else(|| StreamError::MalformedEvent(format!("blank code: {}", payload)))?;
        if !quote.value.is_finite() {
            return Err(StreamError::MalformedEvent(format!(
                "non-finite value: {}",
                payload
            )));
        }
        Ok(quote)
    }

    /// Decode a forex event into its currency pair and rate.
    pub fn parse_rate(raw: &str) -> Result<(CurrencyPair, f64), StreamError> {
        let quote = Self::parse(raw)?;
        let pair = quote
            .symbol
            .parse::<CurrencyPair>()
            .map_err(|e| StreamError::MalformedEvent(e.to_string()))?;
        Ok((pair, quote.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stock_event() {
        let quote = QuoteParser::parse(r#"{"code":"GOOGLE","quote":705.8673}"#).unwrap();
        assert_eq!(quote, Quote::new("GOOGLE", 705.8673));
    }

    #[test]
    fn normalizes_code_like_requested_symbols() {
        let quote = QuoteParser::parse(r#"{"code":" brk.b ","quote":10}"#).unwrap();
        assert_eq!(quote.symbol, "BRK.B");
    }

    #[test]
    fn accepts_integer_values_and_sse_prefix() {
        let quote = QuoteParser::parse("data: {\"code\":\"EUR/USD\",\"quote\":1}\r\n").unwrap();
        assert_eq!(quote, Quote::new("EUR/USD", 1.0));
    }

    #[test]
    fn parses_rate_event_into_pair() {
        let (pair, rate) = QuoteParser::parse_rate(r#"{"code":"eur/usd","quote":1.3}"#).unwrap();
        assert_eq!(pair.to_string(), "EUR/USD");
        assert_eq!(rate, 1.3);
    }

    #[test]
    fn rejects_malformed_events() {
        let cases = [
            "",
            "   ",
            "data:",
            "not json",
            r#"{"code":"GOOGLE"}"#,
            r#"{"quote":12.0}"#,
            r#"{"code":"  ","quote":12.0}"#,
            r#"{"code":"GOOGLE","quote":"12.0"}"#,
            r#"["GOOGLE",12.0]"#,
        ];
        for raw in cases {
            assert!(
                matches!(QuoteParser::parse(raw), Err(StreamError::MalformedEvent(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_rate_event_without_pair_code() {
        let result = QuoteParser::parse_rate(r#"{"code":"GOOGLE","quote":1.3}"#);
        assert!(matches!(result, Err(StreamError::MalformedEvent(_))));
    }
}
