//! Core business logic module
//!
//! This module contains the ledger's core components:
//! - `traits` - Trait abstractions for the engine's collaborators
//! - `account_store` - In-memory account table with per-account locks
//! - `transfer_engine` - Atomic, deadlock-free transfers between accounts
//! - `notification` - Owner notification channel
//! - `batch_processor` - Concurrent driver for batches of operations

pub mod account_store;
pub mod batch_processor;
pub mod notification;
pub mod traits;
pub mod transfer_engine;

pub use account_store::AccountStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use notification::{LoggingNotifier, NotificationError};
pub use traits::Notifier;
pub use transfer_engine::TransferEngine;
