//! Concurrent batch processing of ledger operations
//!
//! This module provides the `BatchProcessor`, which drives a `TransferEngine`
//! from many tokio tasks at once.
//!
//! # Design
//!
//! A batch is split into phases: maximal runs of operations of the same type,
//! kept in input order.
//!
//! ```text
//! [create a, create b, transfer a→b, transfer b→a, transfer a→b, create c]
//!  └──── phase 1 ────┘ └──────────── phase 2 ───────────────┘ └ phase 3 ┘
//!      sequential               spread across workers           sequential
//! ```
//!
//! Creation phases run in order so that every account exists before the
//! transfers that follow it in the input. Transfer phases are dealt
//! round-robin to up to `workers` tasks which run in parallel; the engine's
//! locking keeps them correct under any interleaving.

use tokio::task::JoinSet;

use super::TransferEngine;
use crate::types::{LedgerError, Operation, OperationType};

/// Result of processing a single operation
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The operation that was processed
    pub operation: Operation,

    /// The result of processing (success or error)
    pub result: Result<(), LedgerError>,
}

/// Concurrent driver for a shared `TransferEngine`
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    engine: TransferEngine,

    /// Maximum number of tasks a transfer phase is spread across
    workers: usize,
}

impl BatchProcessor {
    /// Create a processor using at most `workers` concurrent tasks per phase
    ///
    /// A worker count of zero is treated as one.
    pub fn new(engine: TransferEngine, workers: usize) -> Self {
        Self {
            engine,
            workers: workers.max(1),
        }
    }

    /// Split a batch into runs of consecutive operations of the same type
    ///
    /// Every operation appears in exactly one phase, and concatenating the
    /// phases gives back the original batch.
    pub fn split_into_phases(&self, batch: Vec<Operation>) -> Vec<Vec<Operation>> {
        let mut phases: Vec<Vec<Operation>> = Vec::new();

        for operation in batch {
            match phases.last_mut() {
                Some(phase) if phase[0].op_type() == operation.op_type() => phase.push(operation),
                _ => phases.push(vec![operation]),
            }
        }

        phases
    }

    /// Deal operations round-robin into at most `workers` lanes
    pub fn distribute(&self, operations: Vec<Operation>) -> Vec<Vec<Operation>> {
        let lanes = self.workers.min(operations.len());
        let mut distributed: Vec<Vec<Operation>> = vec![Vec::new(); lanes];

        for (index, operation) in operations.into_iter().enumerate() {
            distributed[index % lanes].push(operation);
        }

        distributed
    }

    /// Apply operations one after another on the current task
    pub fn process_sequentially(&self, operations: Vec<Operation>) -> Vec<ProcessingResult> {
        operations
            .into_iter()
            .map(|operation| {
                let result = self.engine.process(operation.clone());
                ProcessingResult { operation, result }
            })
            .collect()
    }

    /// Process a batch phase by phase
    ///
    /// # Returns
    ///
    /// One `ProcessingResult` per input operation. Results of a transfer phase
    /// come back in completion order, not input order.
    pub async fn process_batch(&self, batch: Vec<Operation>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(batch.len());

        for phase in self.split_into_phases(batch) {
            match phase[0].op_type() {
                OperationType::Create => results.extend(self.process_sequentially(phase)),
                OperationType::Transfer => results.extend(self.process_concurrently(phase).await),
            }
        }

        results
    }

    async fn process_concurrently(&self, operations: Vec<Operation>) -> Vec<ProcessingResult> {
        let mut tasks = JoinSet::new();
        for lane in self.distribute(operations) {
            let processor = self.clone();
            tasks.spawn(async move { processor.process_sequentially(lane) });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(lane_results) => results.extend(lane_results),
                Err(e) => tracing::error!(error = %e, "transfer task panicked"),
            }
        }

        results
    }
}
