//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous implementation of the
//! ProcessingStrategy trait. Requests are read in batches and each batch is
//! executed with several requests in flight at once.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent)
//!     ├── AsyncReader (batch CSV reading)
//!     └── SharedLedger (tokio Mutex around the borrowed Ledger)
//! ```
//!
//! # Ordering
//!
//! Batches run one after another. Inside a batch, up to `max_concurrent`
//! requests wait on the ledger lock together and acquire it in no fixed
//! order. With `max_concurrent = 1` the replay is identical to the
//! synchronous strategy.

use crate::core::{Ledger, SharedLedger};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_balances_csv;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of requests read per batch
    pub batch_size: usize,
    /// Maximum number of requests in flight within a batch
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig; zero values fall back to the defaults
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            tracing::warn!(
                "Invalid max_concurrent ({}), using default ({})",
                max_concurrent,
                default.max_concurrent
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Replay requests through a `SharedLedger`
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads requests in batches from CSV using AsyncReader
    /// 3. Executes each batch with at most `max_concurrent` requests in flight
    /// 4. Writes the final balances using the csv_format module
    fn process(
        &self,
        input_path: &Path,
        ledger: &mut Ledger,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let balances = runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let shared = SharedLedger::new(ledger);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                let results = shared.execute_all(batch, self.config.max_concurrent).await;
                for outcome in results {
                    if let Err(e) = outcome.result {
                        tracing::warn!(
                            src = %outcome.request.src,
                            dst = %outcome.request.dst,
                            amount = %outcome.request.amount,
                            error = %e,
                            "Request rejected"
                        );
                    }
                }
            }

            Ok::<_, String>(shared.balances().await)
        })?;

        write_balances_csv(&balances, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::types::{DayRates, RateTable};
    use rstest::rstest;
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
    fn test_async_strategy_replays_requests() {
        let file = create_temp_csv("src,dst,amount\nUSD,AUD,200\n");
        let mut ledger = ledger();
        let mut output = Vec::new();

        AsyncProcessingStrategy::new(BatchConfig::default())
            .process(file.path(), &mut ledger, &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "currency,balance\nAUD,1304.00\nEUR,1000.00\nUSD,800.00\n"
        );
    }

    #[test]
    fn test_async_strategy_keeps_order_across_batches() {
        // The second USD row only fits after the AUD->USD row settled
        let file = create_temp_csv(
            "src,dst,amount\n\
             USD,AUD,1000\n\
             AUD,USD,152\n\
             USD,EUR,100\n",
        );
        let mut ledger = ledger();
        let mut output = Vec::new();

        AsyncProcessingStrategy::new(BatchConfig::new(1, 1))
            .process(file.path(), &mut ledger, &mut output)
            .unwrap();

        assert_eq!(ledger.history().len(), 3);
        assert_eq!(ledger.balances().get("USD"), Decimal::ZERO);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let mut ledger = ledger();
        let mut output = Vec::new();

        let result = AsyncProcessingStrategy::new(BatchConfig::default()).process(
            Path::new("nonexistent.csv"),
            &mut ledger,
            &mut output,
        );
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[rstest]
    #[case::valid(2000, 8, 2000, 8)]
    #[case::zero_batch_size(0, 8, 1000, 8)]
    #[case::zero_max_concurrent(2000, 0, 2000, num_cpus::get())]
    fn test_batch_config_new(
        #[case] batch_size: usize,
        #[case] max_concurrent: usize,
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = BatchConfig::new(batch_size, max_concurrent);
        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent, expected_max_concurrent);
    }
}
