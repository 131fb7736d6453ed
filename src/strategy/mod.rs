//! Processing strategy module for batch replay
//!
//! This module defines the Strategy pattern for replaying a CSV of conversion
//! requests through a ledger, encompassing both CSV parsing and execution.
//! This allows different implementations (synchronous, asynchronous batch) to
//! be selected at runtime.

use crate::cli::StrategyType;
use crate::core::Ledger;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for batch replay pipelines
///
/// Each strategy reads conversion requests from a CSV file, executes them
/// against the given ledger, and writes the final balances to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Replay requests from `input_path` and write final balances to `output`
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the CSV file with `src,dst,amount` rows
    /// * `ledger` - Ledger the requests are executed against
    /// * `output` - Writer receiving the final balances as CSV
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - Output cannot be written
    ///
    /// Rows that fail to parse and requests the ledger rejects are logged as
    /// warnings and skipped; processing continues with the next row.
    fn process(
        &self,
        input_path: &Path,
        ledger: &mut Ledger,
        output: &mut dyn Write,
    ) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
