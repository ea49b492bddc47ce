//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over ledger operations from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record errors are yielded as `LedgerError::ParseError` items
//!   carrying the line number, so callers can log and skip them
//!
//! ```no_run
//! use concurrent_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(operation) => println!("Applying: {:?}", operation),
//!         Err(e) => eprintln!("Skipping: {}", e),
//!     }
//! }
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerError, Operation};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one record at a time into a reused buffer; memory use does not grow
/// with file size.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    record: StringRecord,
}

impl SyncReader {
    /// Open `path` for streaming iteration
    ///
    /// The CSV reader trims whitespace from all fields and allows a flexible
    /// number of fields per row (trailing empty columns may be omitted).
    ///
    /// # Errors
    ///
    /// * `LedgerError::IoError` if the file could not be opened
    /// * `LedgerError::ParseError` if the header row is unreadable
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<Operation, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Err(e) => Some(Err(LedgerError::from(e))),
            Ok(true) => {
                // Line where the record starts, as counted by the csv parser
                let line = self.record.position().map(|pos| pos.line());
                Some(
                    self.record
                        .deserialize::<CsvRecord>(Some(&self.headers))
                        .map_err(LedgerError::from)
                        .and_then(convert_csv_record)
                        .map_err(|e| at_line(e, line)),
                )
            }
        }
    }
}

/// Attach the record's line to an error that does not carry one yet
fn at_line(error: LedgerError, line: Option<u64>) -> LedgerError {
    match error {
        LedgerError::ParseError {
            line: known,
            message,
        } => LedgerError::ParseError {
            line: known.or(line),
            message,
        },
        other => LedgerError::ParseError {
            line,
            message: other.to_string(),
        },
    }
}
