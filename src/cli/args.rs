use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Simulate multi-currency conversions with carbon and compliance checks
#[derive(Parser, Debug)]
#[command(name = "fx-sim")]
#[command(
    about = "Simulate multi-currency conversions with carbon and compliance checks",
    long_about = None
)]
pub struct CliArgs {
    /// Source currency code
    #[arg(value_name = "SRC", required_unless_present = "batch")]
    pub src: Option<String>,

    /// Destination currency code
    #[arg(value_name = "DST", required_unless_present = "batch")]
    pub dst: Option<String>,

    /// Amount of source currency to convert
    #[arg(
        value_name = "AMOUNT",
        required_unless_present = "batch",
        allow_negative_numbers = true,
        help = "Amount of source currency, e.g. 200 or 150.50"
    )]
    pub amount: Option<Decimal>,

    /// Directory holding rates, balances, configuration and logs
    #[arg(long = "data-dir", value_name = "DIR", default_value = "fx_data")]
    pub data_dir: PathBuf,

    /// Compliance rules file (defaults to compliance.json in the data directory)
    #[arg(long = "compliance-config", value_name = "FILE")]
    pub compliance_config: Option<PathBuf>,

    /// Pivot currency the rate table is quoted against
    #[arg(long = "pivot", value_name = "CODE")]
    pub pivot: Option<String>,

    /// Supported currency codes
    #[arg(long = "currencies", value_name = "CODES", value_delimiter = ',')]
    pub currencies: Option<Vec<String>>,

    /// Replay a CSV of `src,dst,amount` requests instead of one conversion
    #[arg(
        long = "batch",
        value_name = "FILE",
        conflicts_with_all = ["src", "dst", "amount"]
    )]
    pub batch: Option<PathBuf>,

    /// Processing strategy for batch replay
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Batch strategy: 'sync' for in-order replay or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Number of requests per batch (async mode only)
    #[arg(long = "batch-size", value_name = "SIZE")]
    pub batch_size: Option<usize>,

    /// Maximum number of requests in flight (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of requests in flight (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,
}

/// Available batch processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// What the invocation asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Single {
        src: String,
        dst: String,
        amount: Decimal,
    },
    Batch(PathBuf),
}

impl CliArgs {
    /// Single conversion or batch replay
    ///
    /// Returns `None` only for argument combinations clap already rejects.
    pub fn mode(&self) -> Option<Mode> {
        if let Some(path) = &self.batch {
            return Some(Mode::Batch(path.clone()));
        }
        match (&self.src, &self.dst, self.amount) {
            (Some(src), Some(dst), Some(amount)) => Some(Mode::Single {
                src: src.clone(),
                dst: dst.clone(),
                amount,
            }),
            _ => None,
        }
    }

    /// Compliance rules file to load
    pub fn compliance_path(&self) -> PathBuf {
        self.compliance_config
            .clone()
            .unwrap_or_else(|| self.data_dir.join(crate::io::file_store::COMPLIANCE_FILE))
    }

    /// Create a BatchConfig from CLI arguments, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent.unwrap_or(default.max_concurrent),
            )
        } else {
            BatchConfig::default()
        }
    }
}
