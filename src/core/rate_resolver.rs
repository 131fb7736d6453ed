//! Exchange-rate derivation
//!
//! Rate tables only quote a sparse set of pairs: normally every currency
//! against one pivot (`USD_AUD`, `EUR_AUD`, ...). The resolver answers any
//! pair it can reach from those quotes:
//!
//! - identity pairs resolve to 1
//! - a direct quote wins when present
//! - `PIVOT_X` is the inverse of `X_PIVOT`
//! - `A_B` is the cross rate `A_PIVOT / B_PIVOT`
//!
//! A zero, negative, or missing pivot quote makes the pivot unavailable for
//! that currency; it never turns into a division fault or a zero rate.

use crate::types::{DayRates, LedgerError, Pair};
use rust_decimal::Decimal;

/// Derives rates for arbitrary pairs from one bucket of quotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateResolver {
    pivot: String,
}

impl RateResolver {
    /// Create a resolver deriving through `pivot`
    pub fn new(pivot: &str) -> Self {
        RateResolver {
            pivot: pivot.trim().to_uppercase(),
        }
    }

    pub fn pivot(&self) -> &str {
        &self.pivot
    }

    /// Resolve the rate converting one unit of `pair.src` into `pair.dst`
    ///
    /// # Errors
    ///
    /// `RateUnavailable` naming the pivot quotes that would have been needed.
    pub fn resolve(&self, day_rates: &DayRates, pair: &Pair) -> Result<Decimal, LedgerError> {
        if pair.is_identity() {
            return Ok(Decimal::ONE);
        }

        let key = pair.key();
        if let Some(rate) = usable_quote(day_rates, &key) {
            return Ok(rate);
        }

        let src_quote = self.pivot_quote(day_rates, &pair.src);
        let dst_quote = self.pivot_quote(day_rates, &pair.dst);

        let derived = match (src_quote, dst_quote) {
            (Some(src), Some(dst)) => src.checked_div(dst),
            _ => None,
        };

        match derived {
            Some(rate) if rate > Decimal::ZERO => {
                tracing::debug!(pair = %key, pivot = %self.pivot, %rate, "Derived rate via pivot");
                Ok(rate)
            }
            _ => {
                let missing = [(&pair.src, src_quote), (&pair.dst, dst_quote)]
                    .into_iter()
                    .filter(|(_, quote)| quote.is_none())
                    .map(|(code, _)| self.quote_key(code))
                    .collect();
                Err(LedgerError::rate_unavailable(&key, missing))
            }
        }
    }

    /// Rate of `code` against the pivot
    ///
    /// The pivot itself is worth exactly one pivot unit. `None` means the
    /// quote is missing or unusable.
    fn pivot_quote(&self, day_rates: &DayRates, code: &str) -> Option<Decimal> {
        if code == self.pivot {
            return Some(Decimal::ONE);
        }
        usable_quote(day_rates, &self.quote_key(code))
    }

    fn quote_key(&self, code: &str) -> String {
        format!("{}_{}", code, self.pivot)
    }
}

/// A quote that is present and strictly positive
fn usable_quote(day_rates: &DayRates, key: &str) -> Option<Decimal> {
    let rate = *day_rates.get(key)?;
    if rate > Decimal::ZERO {
        Some(rate)
    } else {
        tracing::warn!(quote = %key, %rate, "Ignoring non-positive quote");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(quotes: &[(&str, &str)]) -> DayRates {
        quotes
            .iter()
            .map(|(k, v)| (k.to_string(), dec(v)))
            .collect()
    }

    fn sample_day() -> DayRates {
        day(&[("USD_AUD", "1.52"), ("EUR_AUD", "1.66")])
    }

    fn resolve(rates: &DayRates, src: &str, dst: &str) -> Result<Decimal, LedgerError> {
        RateResolver::new("AUD").resolve(rates, &Pair::new(src, dst))
    }

    fn assert_close(actual: Decimal, expected: Decimal) {
        let tolerance = dec("0.000000000001");
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {} ≈ {}",
            actual,
            expected
        );
    }

    #[rstest]
    #[case("USD")]
    #[case("EUR")]
    #[case("AUD")]
    #[case("JPY")]
    fn test_identity_is_one(#[case] code: &str) {
        assert_eq!(resolve(&DayRates::new(), code, code).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_direct_quote() {
        assert_eq!(resolve(&sample_day(), "USD", "AUD").unwrap(), dec("1.52"));
    }

    #[test]
    fn test_direct_quote_wins_over_derivation() {
        let rates = day(&[("USD_AUD", "1.52"), ("EUR_AUD", "1.66"), ("USD_EUR", "0.9")]);
        assert_eq!(resolve(&rates, "USD", "EUR").unwrap(), dec("0.9"));
    }

    #[test]
    fn test_inverse_of_pivot_quote() {
        let rate = resolve(&sample_day(), "AUD", "USD").unwrap();
        assert_close(rate, Decimal::ONE / dec("1.52"));
    }

    #[test]
    fn test_cross_rate() {
        let rate = resolve(&sample_day(), "USD", "EUR").unwrap();
        assert_close(rate, dec("1.52") / dec("1.66"));
        assert_eq!(rate.round_dp(6), dec("0.915663"));
    }

    #[rstest]
    #[case("USD", "EUR")]
    #[case("USD", "AUD")]
    #[case("EUR", "AUD")]
    fn test_round_trip_is_one(#[case] a: &str, #[case] b: &str) {
        let rates = sample_day();
        let forward = resolve(&rates, a, b).unwrap();
        let backward = resolve(&rates, b, a).unwrap();
        assert_close(forward * backward, Decimal::ONE);
    }

    #[test]
    fn test_missing_quote_names_it() {
        let rates = day(&[("USD_AUD", "1.52")]);
        assert_eq!(
            resolve(&rates, "USD", "EUR").unwrap_err(),
            LedgerError::rate_unavailable("USD_EUR", vec!["EUR_AUD".to_string()])
        );
    }

    #[test]
    fn test_missing_both_quotes() {
        assert_eq!(
            resolve(&DayRates::new(), "USD", "EUR").unwrap_err(),
            LedgerError::rate_unavailable(
                "USD_EUR",
                vec!["USD_AUD".to_string(), "EUR_AUD".to_string()]
            )
        );
    }

    #[rstest]
    #[case::zero("0")]
    #[case::negative("-1.66")]
    fn test_unusable_pivot_quote_is_unavailable(#[case] bad: &str) {
        let rates = day(&[("USD_AUD", "1.52"), ("EUR_AUD", bad)]);

        for (src, dst) in [("USD", "EUR"), ("EUR", "USD"), ("AUD", "EUR")] {
            assert!(matches!(
                resolve(&rates, src, dst),
                Err(LedgerError::RateUnavailable { .. })
            ));
        }
        // Unrelated derivations still work
        assert!(resolve(&rates, "AUD", "USD").is_ok());
    }

    #[test]
    fn test_non_positive_direct_quote_falls_back_to_pivot() {
        let rates = day(&[("USD_AUD", "1.52"), ("EUR_AUD", "1.66"), ("USD_EUR", "0")]);
        let rate = resolve(&rates, "USD", "EUR").unwrap();
        assert_close(rate, dec("1.52") / dec("1.66"));
    }

    #[test]
    fn test_other_pivot() {
        let rates = day(&[("AUD_USD", "0.66"), ("EUR_USD", "1.10")]);
        let resolver = RateResolver::new("usd");
        assert_eq!(resolver.pivot(), "USD");

        let rate = resolver.resolve(&rates, &Pair::new("EUR", "AUD")).unwrap();
        assert_close(rate, dec("1.10") / dec("0.66"));
    }
}
