//! Owner notification channel
//!
//! Provides the notification error type and the default `Notifier`, which
//! records each message through `tracing`.

use thiserror::Error;

use crate::core::traits::Notifier;
use crate::types::Account;

/// Failure to deliver a notification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The channel refused or lost the message
    #[error("Failed to notify owner of account {account}: {reason}")]
    DeliveryFailed {
        /// Account whose owner was being notified
        account: String,
        /// Channel-specific reason
        reason: String,
    },
}

impl NotificationError {
    /// Create a DeliveryFailed error
    pub fn delivery_failed(account: &str, reason: &str) -> Self {
        NotificationError::DeliveryFailed {
            account: account.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Notifier that writes every message to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify_about_transfer(
        &self,
        account: &Account,
        message: &str,
    ) -> Result<(), NotificationError> {
        tracing::info!(account = %account.id, "Sending notification to owner: {}", message);
        Ok(())
    }
}
