//! Concurrent Ledger Library
//! # Overview
//!
//! An in-memory ledger of named accounts that moves money between them. The
//! transfer is the heart of the crate: it reads two balances, validates them
//! and updates both atomically, without lost updates, without negative
//! balances and without deadlocks when many transfers run in parallel over
//! overlapping accounts.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Operation, LedgerError)
//! - [`core`] - Business logic components:
//!   - [`core::account_store`] - Account table with one lock per account
//!   - [`core::transfer_engine`] - Atomic transfers with id-ordered locking
//!   - [`core::notification`] - Owner notification channel
//!   - [`core::batch_processor`] - Concurrent driver for operation batches
//! - [`io`] - CSV input and output
//! - [`strategy`] - Sequential and concurrent replay pipelines
//! - [`cli`] - Command-line arguments and logging setup
//!
//! # Invariants
//!
//! - **Conservation**: transfers never change the sum of all balances
//! - **Non-negativity**: no balance ever drops below zero
//! - **Atomicity**: both sides of a transfer change together or not at all

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use crate::core::{AccountStore, LoggingNotifier, NotificationError, Notifier, TransferEngine};
pub use crate::io::write_accounts_csv;
pub use crate::types::{Account, AccountId, LedgerError, Operation, OperationType};
