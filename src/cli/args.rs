use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay account creations and transfers against an in-memory ledger
///
/// Final balances are written to stdout as `account,balance`; logs go to
/// stderr and are filtered with `RUST_LOG`.
#[derive(Parser, Debug)]
#[command(name = "concurrent-ledger", version, long_about = None)]
pub struct CliArgs {
    /// Operations CSV (`type,account,to,amount`)
    #[arg(value_name = "INPUT")]
    pub input_file: PathBuf,

    /// How operations are applied
    #[arg(long, value_enum, default_value_t = StrategyType::Async)]
    pub strategy: StrategyType,

    /// Operations read per batch, async strategy only [default: 1000]
    #[arg(long, value_name = "SIZE")]
    pub batch_size: Option<usize>,

    /// Transfer workers per batch, async strategy only [default: CPU cores]
    #[arg(long, value_name = "COUNT")]
    pub max_concurrent: Option<usize>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    /// Apply operations one by one in file order
    Sync,
    /// Run transfers of each batch concurrently on a tokio runtime
    Async,
}

impl CliArgs {
    /// Batch settings for the async strategy
    ///
    /// Unset options take their defaults; zero values are replaced by
    /// `BatchConfig::new`.
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent.unwrap_or(default.max_concurrent),
        )
    }
}
