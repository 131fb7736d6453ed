//! CSV format handling for batch requests and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRequest structure for deserialization
//! - Conversion from CSV rows to conversion requests
//! - Balance output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Balances, ConversionRequest};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV row structure for deserialization
///
/// Matches the batch input format with columns: src, dst, amount.
/// The amount stays a string here so a malformed value produces a message
/// naming the row instead of a generic deserialization error.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRequest {
    pub src: String,
    pub dst: String,
    pub amount: String,
}

/// Convert a CsvRequest to a ConversionRequest
///
/// Currency codes are passed through as written; the ledger normalizes and
/// validates them. Only the amount is checked here.
///
/// # Arguments
///
/// * `csv_request` - The deserialized CSV row
///
/// # Returns
///
/// Result containing either:
/// - Ok(ConversionRequest) - Successfully converted request
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_request(csv_request: CsvRequest) -> Result<ConversionRequest, String> {
    if csv_request.src.trim().is_empty() || csv_request.dst.trim().is_empty() {
        return Err(format!(
            "Missing currency code in request '{},{}'",
            csv_request.src, csv_request.dst
        ));
    }

    let amount = Decimal::from_str(csv_request.amount.trim()).map_err(|_| {
        format!(
            "Invalid amount '{}' for {}->{}",
            csv_request.amount, csv_request.src, csv_request.dst
        )
    })?;

    Ok(ConversionRequest::new(&csv_request.src, &csv_request.dst, amount))
}

/// Write balances to CSV format
///
/// Writes balances with columns: currency, balance. Rows are in currency
/// order and amounts carry exactly two decimals.
///
/// # Arguments
///
/// * `balances` - Balance map to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_balances_csv(balances: &Balances, output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["currency", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for (currency, amount) in balances.iter() {
        writer
            .write_record(&[currency.clone(), format!("{:.2}", amount)])
            .map_err(|e| format!("Failed to write balance record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
