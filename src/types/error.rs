//! Error types for the FX ledger simulator
//!
//! This module defines all error types that can occur while converting funds.
//! Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Validation Errors**: unsupported currency, non-positive amount
//! - **Funding Errors**: insufficient source balance
//! - **Rate Errors**: no derivable rate, empty rate table
//! - **Arithmetic Errors**: overflow in balance or rate calculations
//! - **Storage Errors**: file not found, I/O failures, malformed JSON/CSV
//!
//! A compliance block is not an error: it is a successful evaluation that
//! produces a record without settling.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
///
/// Every variant except the storage ones is raised before any side effect,
/// so a returned error means no balance changed and no record was written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Currency code outside the supported set
    #[error("Unsupported currency '{currency}' (supported: {supported})")]
    UnsupportedCurrency {
        /// The rejected currency code
        currency: String,
        /// Comma-separated list of supported codes
        supported: String,
    },

    /// Amount is zero or negative
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Source balance does not cover the requested amount
    #[error("Insufficient {currency} balance: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Source currency
        currency: String,
        /// Balance held in the source currency
        available: Decimal,
        /// Requested conversion amount
        requested: Decimal,
    },

    /// No direct quote and no derivation through the pivot
    #[error("No rate available for {pair} (missing quotes: {})", missing.join(", "))]
    RateUnavailable {
        /// Requested pair key
        pair: String,
        /// Pivot quotes that would have been needed
        missing: Vec<String>,
    },

    /// The rate source holds no time bucket at all
    #[error("Rate table contains no dated rate buckets")]
    EmptyRateTable,

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for {currency}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Currency being updated
        currency: String,
    },

    /// Required file not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing a store
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Malformed JSON or CSV content
    #[error("Parse error: {message}")]
    ParseError {
        /// Description of the parse failure
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::ParseError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let message = match error.position() {
            Some(pos) => format!("line {}: {}", pos.line(), error),
            None => error.to_string(),
        };
        LedgerError::ParseError { message }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an UnsupportedCurrency error
    pub fn unsupported_currency<'a>(
        currency: &str,
        supported: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        LedgerError::UnsupportedCurrency {
            currency: currency.to_string(),
            supported: supported
                .into_iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a NonPositiveAmount error
    pub fn non_positive_amount(amount: Decimal) -> Self {
        LedgerError::NonPositiveAmount { amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(currency: &str, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            currency: currency.to_string(),
            available,
            requested,
        }
    }

    /// Create a RateUnavailable error
    pub fn rate_unavailable(pair: &str, missing: Vec<String>) -> Self {
        LedgerError::RateUnavailable {
            pair: pair.to_string(),
            missing,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, currency: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            currency: currency.to_string(),
        }
    }

    /// Create a FileNotFound error
    pub fn file_not_found(path: &std::path::Path) -> Self {
        LedgerError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Whether the request was rejected before any lookup
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::UnsupportedCurrency { .. } | LedgerError::NonPositiveAmount { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::unsupported_currency(
        LedgerError::UnsupportedCurrency { currency: "JPY".to_string(), supported: "AUD, EUR, USD".to_string() },
        "Unsupported currency 'JPY' (supported: AUD, EUR, USD)"
    )]
    #[case::non_positive_amount(
        LedgerError::NonPositiveAmount { amount: Decimal::new(-500, 2) },
        "Amount must be positive, got -5.00"
    )]
    #[case::insufficient_funds(
        LedgerError::InsufficientFunds { currency: "USD".to_string(), available: Decimal::new(100000, 2), requested: Decimal::new(150000, 2) },
        "Insufficient USD balance: available 1000.00, requested 1500.00"
    )]
    #[case::rate_unavailable(
        LedgerError::RateUnavailable { pair: "USD_EUR".to_string(), missing: vec!["EUR_AUD".to_string()] },
        "No rate available for USD_EUR (missing quotes: EUR_AUD)"
    )]
    #[case::rate_unavailable_two_missing(
        LedgerError::RateUnavailable { pair: "USD_EUR".to_string(), missing: vec!["USD_AUD".to_string(), "EUR_AUD".to_string()] },
        "No rate available for USD_EUR (missing quotes: USD_AUD, EUR_AUD)"
    )]
    #[case::empty_rate_table(LedgerError::EmptyRateTable, "Rate table contains no dated rate buckets")]
    #[case::arithmetic_overflow(
        LedgerError::ArithmeticOverflow { operation: "credit".to_string(), currency: "AUD".to_string() },
        "Arithmetic overflow in credit for AUD"
    )]
    #[case::file_not_found(
        LedgerError::FileNotFound { path: "fx_data/fxrates.json".to_string() },
        "File not found: fx_data/fxrates.json"
    )]
    #[case::parse_error(
        LedgerError::ParseError { message: "expected value".to_string() },
        "Parse error: expected value"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::unsupported_currency(
        LedgerError::unsupported_currency("JPY", &["AUD".to_string(), "USD".to_string()]),
        LedgerError::UnsupportedCurrency { currency: "JPY".to_string(), supported: "AUD, USD".to_string() }
    )]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds("EUR", Decimal::new(10, 0), Decimal::new(20, 0)),
        LedgerError::InsufficientFunds { currency: "EUR".to_string(), available: Decimal::new(10, 0), requested: Decimal::new(20, 0) }
    )]
    #[case::arithmetic_overflow(
        LedgerError::arithmetic_overflow("debit", "USD"),
        LedgerError::ArithmeticOverflow { operation: "debit".to_string(), currency: "USD".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case(LedgerError::non_positive_amount(Decimal::ZERO), true)]
    #[case(LedgerError::unsupported_currency("XYZ", &["USD".to_string()]), true)]
    #[case(LedgerError::insufficient_funds("USD", Decimal::ZERO, Decimal::ONE), false)]
    #[case(LedgerError::EmptyRateTable, false)]
    fn test_validation_category(#[case] error: LedgerError, #[case] expected: bool) {
        assert_eq!(error.is_validation(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: LedgerError = json_error.into();
        assert!(matches!(error, LedgerError::ParseError { .. }));
    }
}
