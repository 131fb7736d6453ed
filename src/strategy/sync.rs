//! Synchronous processing strategy
//!
//! Replays requests one at a time in file order. Coordinates:
//! - CSV parsing via `SyncReader` (iterator interface)
//! - Conversion via `Ledger::execute`
//! - CSV output via `csv_format::write_balances_csv`

use crate::core::Ledger;
use crate::io::csv_format::write_balances_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use fx_ledger_sim::config::LedgerConfig;
/// use fx_ledger_sim::core::Ledger;
/// use fx_ledger_sim::io::load_rate_table;
/// use fx_ledger_sim::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let rates = load_rate_table(Path::new("fx_data/fxrates.json")).unwrap();
/// let mut ledger = Ledger::new(rates, LedgerConfig::default());
///
/// SyncProcessingStrategy
///     .process(Path::new("requests.csv"), &mut ledger, &mut std::io::stdout())
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        ledger: &mut Ledger,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let reader = SyncReader::new(input_path)?;

        for row in reader {
            let request = match row {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping request row");
                    continue;
                }
            };

            if let Err(e) = ledger.execute(&request) {
                tracing::warn!(
                    src = %request.src,
                    dst = %request.dst,
                    amount = %request.amount,
                    error = %e,
                    "Request rejected"
                );
            }
        }

        write_balances_csv(&ledger.balances(), output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::types::{DayRates, RateTable};
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn ledger() -> Ledger {
        let mut day = DayRates::new();
        day.insert("USD_AUD".to_string(), Decimal::new(152, 2));
        day.insert("EUR_AUD".to_string(), Decimal::new(166, 2));
        let mut rates = RateTable::new();
        rates.insert_day("2025-08-01", day);
        Ledger::new(rates, LedgerConfig::default())
    }

    #[test]
    fn test_sync_strategy_replays_requests() {
        let file = create_temp_csv("src,dst,amount\nUSD,AUD,200\n");
        let mut ledger = ledger();
        let mut output = Vec::new();

        SyncProcessingStrategy
            .process(file.path(), &mut ledger, &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "currency,balance\nAUD,1304.00\nEUR,1000.00\nUSD,800.00\n"
        );
        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn test_sync_strategy_skips_bad_rows_and_rejections() {
        let file = create_temp_csv(
            "src,dst,amount\n\
             USD,AUD,abc\n\
             USD,JPY,10\n\
             USD,AUD,5000\n\
             EUR,USD,100\n",
        );
        let mut ledger = ledger();
        let mut output = Vec::new();

        SyncProcessingStrategy
            .process(file.path(), &mut ledger, &mut output)
            .unwrap();

        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.balances().get("EUR"), Decimal::from(900));
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let mut ledger = ledger();
        let mut output = Vec::new();

        let result = SyncProcessingStrategy.process(Path::new("nonexistent.csv"), &mut ledger, &mut output);
        assert!(result.unwrap_err().contains("Failed to open file"));
        assert!(output.is_empty());
    }
}
