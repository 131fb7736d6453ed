// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, Mode, StrategyType};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// On invalid arguments (wrong count, non-numeric amount, unknown flag) or
/// `--help`, clap prints the usage message and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
