//! Multi-currency balance types
//!
//! This module defines the `Balances` map and the two-decimal arithmetic used
//! to settle a conversion against it.

use super::currency::normalize_code;
use super::error::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opening balance given to each default currency
pub const DEFAULT_OPENING_BALANCE: i64 = 1000;

/// Currencies seeded when no balance store content exists
pub const DEFAULT_CURRENCIES: [&str; 3] = ["USD", "EUR", "AUD"];

/// Balance per currency code
///
/// Amounts are non-negative with two-decimal precision. The map is ordered by
/// currency code so serialized snapshots are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Decimal>",
    into = "BTreeMap<String, Decimal>"
)]
pub struct Balances(BTreeMap<String, Decimal>);

impl Balances {
    /// Create an empty balance map
    pub fn new() -> Self {
        Balances(BTreeMap::new())
    }

    /// Balance held in `currency` (zero when absent)
    pub fn get(&self, currency: &str) -> Decimal {
        self.0.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// Set a balance, rounding to cents
    pub fn set(&mut self, currency: &str, amount: Decimal) {
        self.0.insert(currency.to_string(), amount.round_dp(2));
    }

    /// Iterate balances in currency order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.0.iter()
    }

    /// Number of currencies held
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no currency is held
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compute the balances after converting `amount_src` of `src` into
    /// `amount_dst` of `dst`
    ///
    /// Returns a new map; `self` is untouched so the caller can apply both legs
    /// at once or not at all.
    ///
    /// # Errors
    ///
    /// - `InsufficientFunds` if the source balance does not cover `amount_src`
    /// - `ArithmeticOverflow` if either leg overflows
    pub fn after_conversion(
        &self,
        src: &str,
        amount_src: Decimal,
        dst: &str,
        amount_dst: Decimal,
    ) -> Result<Balances, LedgerError> {
        let available = self.get(src);
        if available < amount_src {
            return Err(LedgerError::insufficient_funds(src, available, amount_src));
        }

        let mut next = self.clone();

        let debited = available
            .checked_sub(amount_src)
            .ok_or_else(|| LedgerError::arithmetic_overflow("debit", src))?;
        next.set(src, debited);

        // Read dst after the debit so an identity conversion nets to zero
        let credited = next
            .get(dst)
            .checked_add(amount_dst)
            .ok_or_else(|| LedgerError::arithmetic_overflow("credit", dst))?;
        next.set(dst, credited);

        Ok(next)
    }
}

impl Default for Balances {
    /// `{USD: 1000, EUR: 1000, AUD: 1000}`
    fn default() -> Self {
        DEFAULT_CURRENCIES
            .iter()
            .map(|code| (code.to_string(), Decimal::from(DEFAULT_OPENING_BALANCE)))
            .collect()
    }
}

/// Decoded balances: codes are normalized and amounts rounded to cents.
/// Blank codes and negative amounts are dropped with a warning.
impl From<BTreeMap<String, Decimal>> for Balances {
    fn from(raw: BTreeMap<String, Decimal>) -> Self {
        raw.into_iter()
            .filter_map(|(currency, amount)| {
                let currency = normalize_code(&currency);
                if currency.is_empty() {
                    tracing::warn!(%amount, "Dropping balance without a currency code");
                    return None;
                }
                if amount.is_sign_negative() && !amount.is_zero() {
                    tracing::warn!(%currency, %amount, "Dropping negative balance");
                    return None;
                }
                Some((currency, amount))
            })
            .collect()
    }
}

impl From<Balances> for BTreeMap<String, Decimal> {
    fn from(balances: Balances) -> Self {
        balances.0
    }
}

impl FromIterator<(String, Decimal)> for Balances {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        let mut balances = Balances::new();
        for (currency, amount) in iter {
            balances.set(&currency, amount);
        }
        balances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_balances() {
        let balances = Balances::default();
        assert_eq!(balances.len(), 3);
        for code in DEFAULT_CURRENCIES {
            assert_eq!(balances.get(code), dec("1000"));
        }
    }

    #[test]
    fn test_decoding_normalizes_and_drops_negatives() {
        let balances: Balances =
            serde_json::from_str(r#"{" usd ": 800.456, "EUR": -5, "AUD": 1000, "": 3}"#).unwrap();

        assert_eq!(balances.len(), 2);
        assert_eq!(balances.get("USD"), dec("800.46"));
        assert_eq!(balances.get("AUD"), dec("1000"));
        assert_eq!(balances.get("EUR"), Decimal::ZERO);
    }

    #[test]
    fn test_missing_currency_reads_as_zero() {
        assert_eq!(Balances::default().get("JPY"), Decimal::ZERO);
    }

    #[test]
    fn test_after_conversion_moves_both_legs() {
        let before = Balances::default();
        let after = before
            .after_conversion("USD", dec("200"), "AUD", dec("304.00"))
            .unwrap();

        assert_eq!(after.get("USD"), dec("800"));
        assert_eq!(after.get("AUD"), dec("1304"));
        assert_eq!(after.get("EUR"), dec("1000"));
        // Original snapshot untouched
        assert_eq!(before, Balances::default());
    }

    #[test]
    fn test_after_conversion_rounds_to_cents() {
        let after = Balances::default()
            .after_conversion("USD", dec("0.004"), "EUR", dec("0.0037"))
            .unwrap();
        assert_eq!(after.get("USD"), dec("1000.00"));
        assert_eq!(after.get("EUR"), dec("1000.00"));
    }

    #[test]
    fn test_after_conversion_creates_destination() {
        let balances: Balances = [("USD".to_string(), dec("50"))].into_iter().collect();
        let after = balances
            .after_conversion("USD", dec("50"), "AUD", dec("76"))
            .unwrap();
        assert_eq!(after.get("USD"), Decimal::ZERO);
        assert_eq!(after.get("AUD"), dec("76"));
    }

    #[test]
    fn test_after_conversion_identity_pair_is_neutral() {
        let after = Balances::default()
            .after_conversion("EUR", dec("250"), "EUR", dec("250"))
            .unwrap();
        assert_eq!(after, Balances::default());
    }

    #[test]
    fn test_after_conversion_insufficient_funds() {
        let result = Balances::default().after_conversion("USD", dec("1000.01"), "AUD", dec("1"));
        assert_eq!(
            result.unwrap_err(),
            LedgerError::insufficient_funds("USD", dec("1000"), dec("1000.01"))
        );
    }

    #[test]
    fn test_json_shape_is_plain_numbers() {
        let balances: Balances = serde_json::from_str(r#"{"USD": 800.5, "AUD": 1304}"#).unwrap();
        assert_eq!(balances.get("USD"), dec("800.5"));
        assert_eq!(balances.get("AUD"), dec("1304"));

        let value = serde_json::to_value(&balances).unwrap();
        assert!(value["USD"].is_number());
    }
}
