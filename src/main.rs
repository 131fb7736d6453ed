//! FX Ledger Simulator CLI
//!
//! # Usage
//!
//! ```bash
//! cargo run -- USD AUD 200
//! cargo run -- --data-dir fx_data --compliance-config strict.json USD EUR 15000
//! cargo run -- --batch requests.csv > balances.csv
//! cargo run -- --batch requests.csv --strategy async --max-concurrent 4 > balances.csv
//! ```
//!
//! A single conversion prints a summary and persists balances, the
//! transaction record and the audit event under the data directory. Batch
//! replay writes the final balances to stdout as CSV.
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=info`) for more log output on stderr.
//!
//! # Exit Codes
//!
//! - 0: Success (blocked conversions included)
//! - 1: Error (unsupported currency, insufficient funds, missing rates, I/O)
//! - 2: Invalid arguments

use fx_ledger_sim::cli::{self, CliArgs, Mode};
use fx_ledger_sim::config::LedgerConfig;
use fx_ledger_sim::core::Ledger;
use fx_ledger_sim::io::console::write_summary;
use fx_ledger_sim::io::file_store::{DataPaths, JsonBalanceFile, JsonLogFile};
use fx_ledger_sim::io::load_rate_table;
use fx_ledger_sim::strategy;
use fx_ledger_sim::types::{AuditEvent, ConversionRequest, TransactionRecord};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), String> {
    let mut ledger = open_ledger(args).map_err(|e| e.to_string())?;

    match args.mode() {
        Some(Mode::Single { src, dst, amount }) => {
            let record = ledger
                .execute(&ConversionRequest::new(&src, &dst, amount))
                .map_err(|e| e.to_string())?;
            write_summary(&record, &mut std::io::stdout())
                .map_err(|e| format!("Failed to write summary: {}", e))
        }
        Some(Mode::Batch(input)) => {
            let config = match args.strategy {
                cli::StrategyType::Async => Some(args.to_batch_config()),
                cli::StrategyType::Sync => None,
            };
            let strategy = strategy::create_strategy(args.strategy, config);
            strategy.process(&input, &mut ledger, &mut std::io::stdout())
        }
        None => Err("Expected SRC DST AMOUNT or --batch FILE".to_string()),
    }
}

/// Load configuration and rates, and wire the JSON-file stores
fn open_ledger(args: &CliArgs) -> Result<Ledger, fx_ledger_sim::LedgerError> {
    let paths = DataPaths::new(&args.data_dir).with_compliance(args.compliance_path());

    let mut config = LedgerConfig::load(&paths.compliance, &paths.carbon_factors)?;
    if let Some(pivot) = &args.pivot {
        config = config.with_pivot(pivot);
    }
    if let Some(currencies) = &args.currencies {
        config = config.with_supported_currencies(currencies);
    }

    let rates = load_rate_table(&paths.rates)?;
    let balances = JsonBalanceFile::open(&paths.balances)?;
    let history: JsonLogFile<TransactionRecord> = JsonLogFile::open(&paths.history)?;
    let audit: JsonLogFile<AuditEvent> = JsonLogFile::open(&paths.audit)?;

    tracing::debug!(
        data_dir = %args.data_dir.display(),
        prior_records = history.entries().len(),
        "Ledger opened"
    );

    Ok(Ledger::new(rates, config)
        .with_balance_store(balances)
        .with_history_store(history)
        .with_audit_log(audit))
}
