//! Thread-safe in-memory account table
//!
//! This module provides the `AccountStore`, the single owner of every account
//! and its authoritative balance.
//!
//! # Design
//!
//! Accounts live in a `DashMap` keyed by id. Each value is an
//! `Arc<Mutex<Account>>`, so the map's shard locks only guard the table
//! structure while the per-account mutex guards the balance. Resolving an id
//! clones the `Arc` and releases the shard lock immediately; the transfer
//! engine then takes account mutexes without holding any shard lock, which
//! keeps shard locking out of the lock-ordering protocol.
//!
//! # Thread Safety
//!
//! - `create` uses the map's entry API, so two concurrent creations of the same
//!   id cannot both succeed.
//! - `get` copies the account while holding its mutex, so readers never see a
//!   balance halfway through a transfer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::types::{Account, AccountId, LedgerError};

/// Shared handle to a single account's protected state
pub(crate) type AccountHandle = Arc<Mutex<Account>>;

/// Lock an account handle
///
/// Critical sections never panic (all arithmetic is checked), so a poisoned
/// mutex still holds a consistent account and is recovered rather than
/// propagated.
pub(crate) fn lock_account(handle: &AccountHandle) -> MutexGuard<'_, Account> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory mapping from account id to account state
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: DashMap<AccountId, AccountHandle>,
}

impl AccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Insert a new account
    ///
    /// # Errors
    ///
    /// * `LedgerError::DuplicateAccount` if the id is already present. The
    ///   existing account is not modified.
    pub fn create(&self, account: Account) -> Result<(), LedgerError> {
        match self.accounts.entry(account.id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::duplicate_account(&account.id)),
            Entry::Vacant(slot) => {
                tracing::debug!(account = %account.id, balance = %account.balance, "account created");
                slot.insert(Arc::new(Mutex::new(account)));
                Ok(())
            }
        }
    }

    /// Snapshot of the account for `id`, or `None` if absent
    pub fn get(&self, id: &str) -> Option<Account> {
        let handle = self.handle(id)?;
        let account = lock_account(&handle).clone();
        Some(account)
    }

    /// Resolve `id` to its shared handle without locking the account
    pub(crate) fn handle(&self, id: &str) -> Option<AccountHandle> {
        self.accounts.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove every account
    ///
    /// Test isolation hook. Transfers already holding a handle finish against
    /// the detached account.
    pub fn clear(&self) {
        self.accounts.clear();
    }

    /// Number of accounts in the store
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Snapshots of all accounts, sorted by id
    pub fn get_all_accounts(&self) -> Vec<Account> {
        let handles: Vec<AccountHandle> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut accounts: Vec<Account> = handles
            .iter()
            .map(|handle| lock_account(handle).clone())
            .collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts
    }

    /// Sum of all balances
    ///
    /// Each balance is read consistently, but the sum is only a true global
    /// total while no transfers are in flight.
    pub fn total_balance(&self) -> Decimal {
        self.get_all_accounts()
            .iter()
            .map(|account| account.balance)
            .sum()
    }
}
