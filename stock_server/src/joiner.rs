//! Join of a stock quote with the latest exchange rate.

use stock_common::{ConvertedQuote, CurrencyPair, Quote};

use crate::model::rate_tracker::RateTracker;

/// Outcome of joining one quote with the rate state.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// The quote converted with the latest rate.
    Converted(ConvertedQuote),
    /// No usable rate for the pair yet; nothing is emitted.
    Suppressed,
}

/// Stateless conversion of stock quotes into the target currency.
pub struct ConversionJoiner;

impl ConversionJoiner {
    /// Convert `quote` using the rate currently recorded for `pair`.
    ///
    /// The price is divided by the rate (`1300 / 1.3 = 1000`). A pair that was never
    /// observed, or whose latest rate is zero, suppresses the quote.
    pub fn convert(quote: &Quote, rates: &RateTracker, pair: &CurrencyPair) -> Conversion {
        match rates.current_rate(pair) {
            Some(rate) if rate != 0.0 => Conversion::Converted(ConvertedQuote {
                code: quote.symbol.clone(),
                quote: quote.value / rate,
            }),
            _ => Conversion::Suppressed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur_usd() -> CurrencyPair {
        CurrencyPair::default()
    }

    #[test]
    fn suppresses_when_rate_unknown() {
        let rates = RateTracker::new();
        let conversion = ConversionJoiner::convert(&Quote::new("GOOGLE", 1300.0), &rates, &eur_usd());
        assert_eq!(conversion, Conversion::Suppressed);
    }

    #[test]
    fn divides_price_by_rate() {
        let mut rates = RateTracker::new();
        rates.update(eur_usd(), 1.3);

        match ConversionJoiner::convert(&Quote::new("GOOGLE", 1300.0), &rates, &eur_usd()) {
            Conversion::Converted(converted) => {
                assert_eq!(converted.code, "GOOGLE");
                assert!((converted.quote - 1000.0).abs() < 1e-9);
            }
            Conversion::Suppressed => panic!("rate is known, quote must convert"),
        }
    }

    #[test]
    fn ignores_rates_of_other_pairs() {
        let mut rates = RateTracker::new();
        rates.update("GBP/USD".parse().unwrap(), 1.25);
        let conversion = ConversionJoiner::convert(&Quote::new("GOOGLE", 1300.0), &rates, &eur_usd());
        assert_eq!(conversion, Conversion::Suppressed);
    }

    #[test]
    fn suppresses_on_zero_rate() {
        let mut rates = RateTracker::new();
        rates.update(eur_usd(), 0.0);
        let conversion = ConversionJoiner::convert(&Quote::new("GOOGLE", 1300.0), &rates, &eur_usd());
        assert_eq!(conversion, Conversion::Suppressed);
    }

    #[test]
    fn converts_with_negative_rate() {
        let mut rates = RateTracker::new();
        rates.update(eur_usd(), -2.0);
        let conversion = ConversionJoiner::convert(&Quote::new("GOOGLE", 10.0), &rates, &eur_usd());
        assert_eq!(
            conversion,
            Conversion::Converted(ConvertedQuote {
                code: "GOOGLE".to_string(),
                quote: -5.0,
            })
        );
    }
}
