//! Sequential processing strategy
//!
//! Streams the operations file with `SyncReader` and applies each operation
//! to a `TransferEngine` in file order on the calling thread. The outcome is
//! fully determined by the input, which makes this strategy the reference
//! the concurrent one is compared against.

use crate::core::TransferEngine;
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, RunSummary};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;

/// Sequential processing strategy
///
/// ```no_run
/// use concurrent_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let mut output = std::io::stdout();
/// SyncProcessingStrategy
///     .process(Path::new("operations.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<RunSummary, LedgerError> {
        let engine = TransferEngine::default();
        let reader = SyncReader::new(input_path)?;
        let mut summary = RunSummary::default();

        for record in reader {
            match record {
                Ok(operation) => {
                    let result = engine.process(operation.clone());
                    summary.record(&operation, &result);
                }
                Err(e) => {
                    summary.skipped += 1;
                    tracing::warn!(error = %e, "skipping invalid record");
                }
            }
        }

        write_accounts_csv(&engine.get_accounts(), output)?;
        summary.log(engine.store().total_balance());

        Ok(summary)
    }
}
