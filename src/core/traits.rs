//! Core traits for the collaborators the transfer engine depends on
//!
//! The engine talks to its notification channel only through the `Notifier`
//! trait, so the locking and balance logic can be exercised without a real
//! delivery channel.

use crate::core::notification::NotificationError;
use crate::types::Account;

/// Best-effort delivery of messages to account owners
///
/// Implementations must be shareable across threads because one notifier is
/// used by every concurrent transfer. Failures are reported to the caller,
/// which logs them; they never affect the outcome of a transfer.
pub trait Notifier: Send + Sync {
    /// Tell the owner of `account` about a completed transfer
    fn notify_about_transfer(&self, account: &Account, message: &str)
        -> Result<(), NotificationError>;
}
