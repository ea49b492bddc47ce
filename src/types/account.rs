//! Account-related types for the ledger
//!
//! This module defines the Account structure and the validation applied
//! when an account is opened.

use super::error::LedgerError;
use rust_decimal::Decimal;

/// Account identifier
///
/// Identifiers are compared lexicographically; that ordering is the global
/// lock order used by the transfer engine.
pub type AccountId = String;

/// Named holder of a non-negative monetary balance
///
/// Instances handed out by the store are snapshots. The authoritative balance
/// lives inside the `AccountStore` and is only mutated by the `TransferEngine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique, non-empty identifier. Immutable after creation.
    pub id: AccountId,

    /// Current balance
    ///
    /// Exact decimal arithmetic; never negative outside a transfer's critical
    /// section.
    pub balance: Decimal,
}

impl Account {
    /// Open an account with an initial balance
    ///
    /// # Errors
    ///
    /// * `LedgerError::EmptyAccountId` if `id` is empty or whitespace
    /// * `LedgerError::NegativeBalance` if `balance` is below zero
    pub fn new(id: impl Into<AccountId>, balance: Decimal) -> Result<Self, LedgerError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(LedgerError::EmptyAccountId);
        }
        if balance < Decimal::ZERO {
            return Err(LedgerError::negative_balance(&id, balance));
        }
        Ok(Account { id, balance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::positive("Id-123", dec!(1000))]
    #[case::zero("Id-0", Decimal::ZERO)]
    #[case::fractional("Id-frac", dec!(0.0001))]
    fn test_new_accepts_valid_accounts(#[case] id: &str, #[case] balance: Decimal) {
        let account = Account::new(id, balance).unwrap();
        assert_eq!(account.id, id);
        assert_eq!(account.balance, balance);
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("   ")]
    fn test_new_rejects_empty_id(#[case] id: &str) {
        assert_eq!(
            Account::new(id, dec!(10)).unwrap_err(),
            LedgerError::EmptyAccountId
        );
    }

    #[test]
    fn test_new_rejects_negative_balance() {
        assert_eq!(
            Account::new("Id-1", dec!(-0.01)).unwrap_err(),
            LedgerError::negative_balance("Id-1", dec!(-0.01))
        );
    }

    #[test]
    fn test_negative_zero_is_accepted() {
        let account = Account::new("Id-1", -Decimal::ZERO).unwrap();
        assert!(account.balance.is_zero());
    }
}
