//! Rate table types
//!
//! A `RateTable` maps a date bucket (ISO-8601 date string) to the quotes
//! published for that day. Buckets are kept in key order so the latest one is
//! simply the last.

use super::error::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quotes for one bucket: pair key (`SRC_DST`) → rate
pub type DayRates = BTreeMap<String, Decimal>;

/// Dated rate buckets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<String, DayRates>);

impl RateTable {
    pub fn new() -> Self {
        RateTable(BTreeMap::new())
    }

    /// Add (or replace) the quotes for a date bucket
    pub fn insert_day(&mut self, date: &str, rates: DayRates) {
        self.0.insert(date.to_string(), rates);
    }

    /// Latest bucket by key order
    ///
    /// # Errors
    ///
    /// `EmptyRateTable` when no bucket exists.
    pub fn latest(&self) -> Result<(&str, &DayRates), LedgerError> {
        self.0
            .iter()
            .next_back()
            .map(|(date, rates)| (date.as_str(), rates))
            .ok_or(LedgerError::EmptyRateTable)
    }

    /// Number of date buckets
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_picks_max_date() {
        let table: RateTable = serde_json::from_str(
            r#"{
                "2025-08-01": {"USD_AUD": 1.52},
                "2025-07-31": {"USD_AUD": 1.50},
                "2025-08-02": {"USD_AUD": 1.53, "EUR_AUD": 1.67}
            }"#,
        )
        .unwrap();

        let (date, rates) = table.latest().unwrap();
        assert_eq!(date, "2025-08-02");
        assert_eq!(rates.len(), 2);
        assert_eq!(rates["USD_AUD"], Decimal::new(153, 2));
    }

    #[test]
    fn test_latest_on_empty_table() {
        assert_eq!(RateTable::new().latest(), Err(LedgerError::EmptyRateTable));
    }
}
