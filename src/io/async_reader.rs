//! Asynchronous CSV reader with batch interface
//!
//! Reads ledger operations from any `futures::io::AsyncRead` in batches, for
//! the concurrent processing strategy.
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of Operations
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::Operation;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
///
/// Streams the input; only one batch is held in memory at a time.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    skipped: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Wrap an async byte source
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            skipped: 0,
        }
    }

    /// Number of records skipped so far because they were malformed
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Read up to `batch_size` operations
    ///
    /// Malformed records are logged and skipped. Returns an empty vector at
    /// end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Operation> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(operation) => batch.push(operation),
                    Err(e) => {
                        self.skipped += 1;
                        tracing::warn!(error = %e, "skipping invalid record");
                    }
                },
                Some(Err(e)) => {
                    self.skipped += 1;
                    tracing::warn!(error = %e, "skipping malformed CSV row");
                }
                None => break,
            }
        }

        batch
    }
}
