//! Processing strategy module for replaying operation files
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! from reading the operations CSV through the transfer engine to writing the
//! final balances. Implementations (sequential, concurrent batch) are selected
//! at runtime.

use crate::cli::StrategyType;
use crate::types::{LedgerError, Operation};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Outcome counts of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Operations the ledger accepted
    pub applied: u64,
    /// Well-formed operations the ledger refused
    pub rejected: u64,
    /// Malformed records that never reached the ledger
    pub skipped: u64,
}

impl RunSummary {
    /// Count the outcome of one operation, logging refusals
    pub fn record(&mut self, operation: &Operation, result: &Result<(), LedgerError>) {
        match result {
            Ok(()) => self.applied += 1,
            Err(e) => {
                self.rejected += 1;
                let outcome = if e.is_rejection() {
                    "operation rejected"
                } else {
                    "invalid operation"
                };
                tracing::warn!(
                    operation = ?operation.op_type(),
                    account = operation.account(),
                    error = %e,
                    "{}",
                    outcome
                );
            }
        }
    }

    fn log(&self, total_balance: Decimal) {
        tracing::info!(
            applied = self.applied,
            rejected = self.rejected,
            skipped = self.skipped,
            %total_balance,
            "run complete"
        );
    }
}

/// Processing strategy trait for complete pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Replay the operations in `input_path` and write final balances to `output`
    ///
    /// Individual operation failures are logged and counted in the returned
    /// summary; they do not abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - The output cannot be written
    /// - The async runtime cannot be started
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<RunSummary, LedgerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` means defaults.
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
