//! Concurrent ledger CLI
//!
//! Replays account creations and transfers from a CSV file and prints the
//! final balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > balances.csv
//! cargo run -- --strategy sync operations.csv > balances.csv
//! RUST_LOG=concurrent_ledger=debug cargo run -- --max-concurrent 8 operations.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Fatal error (file not found, unreadable input, output failure)

use concurrent_ledger::cli::{self, StrategyType};
use concurrent_ledger::strategy;
use std::process;

fn main() {
    cli::init_tracing();

    let args = cli::parse_args();
    let config = (args.strategy == StrategyType::Async).then(|| args.to_batch_config());
    let strategy = strategy::create_strategy(args.strategy, config);

    tracing::debug!(input = %args.input_file.display(), strategy = ?args.strategy, "starting replay");

    let mut output = std::io::stdout().lock();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        tracing::error!(error = %e, "processing failed");
        process::exit(1);
    }
}
