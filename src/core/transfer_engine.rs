//! Transfer processing with per-account locking
//!
//! This module provides the `TransferEngine`, which moves money between two
//! accounts of an `AccountStore` as one atomic step relative to every other
//! transfer.
//!
//! # Locking Protocol
//!
//! ```text
//! resolve(from), resolve(to)        shard locks taken and released
//!     │
//!     ▼
//! lock min(from, to)                lexicographic id order,
//! lock max(from, to)                independent of direction
//!     │
//!     ▼
//! check funds, apply both updates   balances read inside the region
//!     │
//!     ▼
//! unlock both, notify owners        no I/O while locked
//! ```
//!
//! Because every transfer acquires its two account mutexes in the same global
//! order, transfers A→B and B→A can never wait on each other in a cycle. A
//! self-transfer takes its single mutex once.

use std::fmt;
use std::sync::{Arc, MutexGuard};

use rust_decimal::Decimal;

use super::account_store::{lock_account, AccountHandle, AccountStore};
use super::notification::LoggingNotifier;
use super::traits::Notifier;
use crate::types::{Account, LedgerError, Operation};

/// Moves money between accounts while preserving conservation and
/// non-negativity
///
/// The engine is cheap to clone; clones share the same store and notifier and
/// can be handed to any number of threads or tasks.
#[derive(Clone)]
pub struct TransferEngine {
    /// Authoritative account table
    store: Arc<AccountStore>,

    /// Channel used to tell owners about completed transfers
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for TransferEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferEngine")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new(Arc::new(AccountStore::new()), Arc::new(LoggingNotifier))
    }
}

impl TransferEngine {
    /// Create an engine over `store` that reports through `notifier`
    pub fn new(store: Arc<AccountStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// The account table this engine operates on
    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// Open a new account
    ///
    /// # Errors
    ///
    /// * `LedgerError::DuplicateAccount` if the id is taken
    pub fn create_account(&self, account: Account) -> Result<(), LedgerError> {
        self.store.create(account)
    }

    /// Snapshot of an account, or `None` if it does not exist
    pub fn get_account(&self, id: &str) -> Option<Account> {
        self.store.get(id)
    }

    /// Snapshots of all accounts, sorted by id
    pub fn get_accounts(&self) -> Vec<Account> {
        self.store.get_all_accounts()
    }

    /// Apply a single request-layer operation
    pub fn process(&self, operation: Operation) -> Result<(), LedgerError> {
        match operation {
            Operation::Create { account, balance } => {
                self.create_account(Account::new(account, balance)?)
            }
            Operation::Transfer { from, to, amount } => self.transfer(&from, &to, amount),
        }
    }

    /// Move `amount` from account `from` to account `to`
    ///
    /// Both balances are read, checked and updated while holding both account
    /// locks, so concurrent transfers can neither lose an update nor spend the
    /// same funds twice. Owners are notified after the locks are released;
    /// notification failures are logged and do not affect the result.
    ///
    /// A transfer from an account to itself succeeds without changing the
    /// balance when the account could cover the amount, and sends no
    /// notifications.
    ///
    /// # Errors
    ///
    /// * `LedgerError::AccountNotFound` if either id is unknown
    /// * `LedgerError::InvalidAmount` if `amount` is zero or negative
    /// * `LedgerError::InsufficientFunds` if the origin balance would go below zero
    /// * `LedgerError::ArithmeticOverflow` if the destination balance would overflow
    ///
    /// No balance is modified when an error is returned.
    pub fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<(), LedgerError> {
        let origin = self
            .store
            .handle(from)
            .ok_or_else(|| LedgerError::account_not_found(from))?;
        let destination = self
            .store
            .handle(to)
            .ok_or_else(|| LedgerError::account_not_found(to))?;

        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }

        if from == to {
            return transfer_to_self(&origin, amount);
        }

        let (origin_snapshot, destination_snapshot) = {
            let (mut origin_account, mut destination_account) =
                lock_in_order(from, &origin, to, &destination);

            let debited = debited_balance(&origin_account, amount)?;
            let credited = destination_account
                .balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", to))?;

            origin_account.balance = debited;
            destination_account.balance = credited;

            (origin_account.clone(), destination_account.clone())
        };

        tracing::debug!(%from, %to, %amount, "transfer applied");

        self.notify(&origin_snapshot, &format!("{} sent to {}", amount, to));
        self.notify(
            &destination_snapshot,
            &format!("{} received from {}", amount, from),
        );

        Ok(())
    }

    fn notify(&self, account: &Account, message: &str) {
        if let Err(e) = self.notifier.notify_about_transfer(account, message) {
            tracing::warn!(account = %account.id, error = %e, "owner notification failed");
        }
    }
}

/// Lock both accounts, lower id first
///
/// Guards are returned as (origin, destination) whatever the lock order was.
fn lock_in_order<'a>(
    from: &str,
    origin: &'a AccountHandle,
    to: &str,
    destination: &'a AccountHandle,
) -> (MutexGuard<'a, Account>, MutexGuard<'a, Account>) {
    if from < to {
        let origin_account = lock_account(origin);
        let destination_account = lock_account(destination);
        (origin_account, destination_account)
    } else {
        let destination_account = lock_account(destination);
        let origin_account = lock_account(origin);
        (origin_account, destination_account)
    }
}

/// Balance left after taking `amount` out of `account`
///
/// The only funds rule: the result must not be negative. An account at zero
/// therefore cannot fund any positive amount.
fn debited_balance(account: &Account, amount: Decimal) -> Result<Decimal, LedgerError> {
    let remaining = account
        .balance
        .checked_sub(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", &account.id))?;

    if remaining < Decimal::ZERO {
        return Err(LedgerError::insufficient_funds(
            &account.id,
            account.balance,
            amount,
        ));
    }

    Ok(remaining)
}

fn transfer_to_self(handle: &AccountHandle, amount: Decimal) -> Result<(), LedgerError> {
    let account = lock_account(handle);
    debited_balance(&account, amount)?;
    tracing::debug!(account = %account.id, %amount, "self-transfer leaves balance unchanged");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notification::NotificationError;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<(String, String)> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify_about_transfer(
            &self,
            account: &Account,
            message: &str,
        ) -> Result<(), NotificationError> {
            self.messages
                .lock()
                .unwrap()
                .push((account.id.clone(), message.to_string()));
            Ok(())
        }
    }

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify_about_transfer(
            &self,
            account: &Account,
            _message: &str,
        ) -> Result<(), NotificationError> {
            Err(NotificationError::delivery_failed(&account.id, "smtp down"))
        }
    }

    fn engine_with(notifier: Arc<dyn Notifier>, accounts: &[(&str, Decimal)]) -> TransferEngine {
        let engine = TransferEngine::new(Arc::new(AccountStore::new()), notifier);
        for (id, balance) in accounts {
            engine
                .create_account(Account::new(*id, *balance).unwrap())
                .unwrap();
        }
        engine
    }

    fn engine(accounts: &[(&str, Decimal)]) -> TransferEngine {
        engine_with(Arc::new(RecordingNotifier::default()), accounts)
    }

    fn balance(engine: &TransferEngine, id: &str) -> Decimal {
        engine.get_account(id).unwrap().balance
    }

    #[test]
    fn test_transfer_moves_funds() {
        let engine = engine(&[("alice", dec!(100)), ("bob", dec!(20))]);

        engine.transfer("alice", "bob", dec!(30.50)).unwrap();

        assert_eq!(balance(&engine, "alice"), dec!(69.50));
        assert_eq!(balance(&engine, "bob"), dec!(50.50));
    }

    #[test]
    fn test_transfer_direction_does_not_depend_on_lock_order() {
        // "zed" sorts after "amy", so the destination is locked first here
        let engine = engine(&[("zed", dec!(10)), ("amy", dec!(0))]);

        engine.transfer("zed", "amy", dec!(4)).unwrap();

        assert_eq!(balance(&engine, "zed"), dec!(6));
        assert_eq!(balance(&engine, "amy"), dec!(4));
    }

    #[test]
    fn test_transfer_entire_balance_leaves_zero() {
        let engine = engine(&[("alice", dec!(50)), ("bob", dec!(0))]);

        engine.transfer("alice", "bob", dec!(50)).unwrap();

        assert_eq!(balance(&engine, "alice"), Decimal::ZERO);
        assert_eq!(balance(&engine, "bob"), dec!(50));
    }

    #[rstest]
    #[case::unknown_origin("ghost", "bob", "ghost")]
    #[case::unknown_destination("alice", "ghost", "ghost")]
    #[case::both_unknown("ghost", "phantom", "ghost")]
    fn test_transfer_unknown_account(
        #[case] from: &str,
        #[case] to: &str,
        #[case] missing: &str,
    ) {
        let engine = engine(&[("alice", dec!(100)), ("bob", dec!(0))]);

        let result = engine.transfer(from, to, dec!(10));

        assert_eq!(result, Err(LedgerError::account_not_found(missing)));
        assert_eq!(balance(&engine, "alice"), dec!(100));
        assert_eq!(balance(&engine, "bob"), Decimal::ZERO);
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(dec!(-10))]
    #[case::tiny_negative(dec!(-0.0001))]
    fn test_transfer_invalid_amount(#[case] amount: Decimal) {
        let engine = engine(&[("alice", dec!(100)), ("bob", dec!(0))]);

        let result = engine.transfer("alice", "bob", amount);

        assert_eq!(result, Err(LedgerError::invalid_amount(amount)));
        assert_eq!(balance(&engine, "alice"), dec!(100));
        assert_eq!(balance(&engine, "bob"), Decimal::ZERO);
    }

    #[rstest]
    #[case::overdraw(dec!(10), dec!(10.01))]
    #[case::empty_origin(Decimal::ZERO, dec!(0.01))]
    fn test_transfer_insufficient_funds(#[case] initial: Decimal, #[case] amount: Decimal) {
        let engine = engine(&[("alice", initial), ("bob", dec!(5))]);

        let result = engine.transfer("alice", "bob", amount);

        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds("alice", initial, amount))
        );
        assert_eq!(balance(&engine, "alice"), initial);
        assert_eq!(balance(&engine, "bob"), dec!(5));
    }

    #[test]
    fn test_transfer_destination_overflow_leaves_both_untouched() {
        let engine = engine(&[("alice", dec!(10)), ("bob", Decimal::MAX)]);

        let result = engine.transfer("alice", "bob", dec!(1));

        assert_eq!(
            result,
            Err(LedgerError::arithmetic_overflow("transfer", "bob"))
        );
        assert_eq!(balance(&engine, "alice"), dec!(10));
        assert_eq!(balance(&engine, "bob"), Decimal::MAX);
    }

    #[test]
    fn test_self_transfer_is_noop() {
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = engine_with(notifier.clone(), &[("alice", dec!(100))]);

        engine.transfer("alice", "alice", dec!(40)).unwrap();

        assert_eq!(balance(&engine, "alice"), dec!(100));
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_self_transfer_beyond_balance_is_rejected() {
        let engine = engine(&[("alice", dec!(10))]);

        let result = engine.transfer("alice", "alice", dec!(11));

        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds("alice", dec!(10), dec!(11)))
        );
        assert_eq!(balance(&engine, "alice"), dec!(10));
    }

    #[test]
    fn test_successful_transfer_notifies_both_owners() {
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = engine_with(notifier.clone(), &[("alice", dec!(100)), ("bob", dec!(0))]);

        engine.transfer("alice", "bob", dec!(25)).unwrap();

        assert_eq!(
            notifier.messages(),
            vec![
                ("alice".to_string(), "25 sent to bob".to_string()),
                ("bob".to_string(), "25 received from alice".to_string()),
            ]
        );
    }

    #[test]
    fn test_failed_transfer_sends_no_notifications() {
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = engine_with(notifier.clone(), &[("alice", dec!(1)), ("bob", dec!(0))]);

        assert!(engine.transfer("alice", "bob", dec!(25)).is_err());

        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_notification_failure_does_not_fail_transfer() {
        let engine = engine_with(
            Arc::new(FailingNotifier),
            &[("alice", dec!(100)), ("bob", dec!(0))],
        );

        assert!(engine.transfer("alice", "bob", dec!(60)).is_ok());

        assert_eq!(balance(&engine, "alice"), dec!(40));
        assert_eq!(balance(&engine, "bob"), dec!(60));
    }

    #[test]
    fn test_process_create_then_transfer() {
        let engine = engine(&[]);

        engine
            .process(Operation::Create {
                account: "alice".to_string(),
                balance: dec!(10),
            })
            .unwrap();
        engine
            .process(Operation::Create {
                account: "bob".to_string(),
                balance: Decimal::ZERO,
            })
            .unwrap();
        engine
            .process(Operation::Transfer {
                from: "alice".to_string(),
                to: "bob".to_string(),
                amount: dec!(3),
            })
            .unwrap();

        assert_eq!(balance(&engine, "alice"), dec!(7));
        assert_eq!(balance(&engine, "bob"), dec!(3));
    }

    #[rstest]
    #[case::duplicate(
        Operation::Create { account: "alice".to_string(), balance: dec!(1) },
        LedgerError::duplicate_account("alice")
    )]
    #[case::negative_opening_balance(
        Operation::Create { account: "carol".to_string(), balance: dec!(-1) },
        LedgerError::negative_balance("carol", dec!(-1))
    )]
    #[case::empty_id(
        Operation::Create { account: "".to_string(), balance: dec!(1) },
        LedgerError::EmptyAccountId
    )]
    fn test_process_create_errors(#[case] operation: Operation, #[case] expected: LedgerError) {
        let engine = engine(&[("alice", dec!(10))]);

        assert_eq!(engine.process(operation), Err(expected));
        assert_eq!(balance(&engine, "alice"), dec!(10));
    }

    #[test]
    fn test_concurrent_opposite_transfers_conserve_total() {
        use std::thread;

        let engine = engine(&[("a", dec!(1000)), ("b", dec!(1000))]);
        let mut handles = vec![];

        for i in 0..8 {
            let engine = engine.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..200 {
                    if i % 2 == 0 {
                        let _ = engine.transfer("a", "b", dec!(3));
                    } else {
                        let _ = engine.transfer("b", "a", dec!(3));
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.store().total_balance(), dec!(2000));
        assert!(balance(&engine, "a") >= Decimal::ZERO);
        assert!(balance(&engine, "b") >= Decimal::ZERO);
    }
}
