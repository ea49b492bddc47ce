//! Ledger operation types
//!
//! This module defines the requests the ledger accepts from its request
//! layer: opening an account and moving money between two accounts.

use super::account::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operation kinds understood by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Open a new account with an initial balance
    Create,

    /// Move a positive amount from one account to another
    Transfer,
}

/// A validated request for the ledger
///
/// Produced by the request layer once the raw input has been checked for
/// shape (ids present, decimals well formed). Domain checks such as
/// duplicate ids or insufficient funds happen in the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Open `account` holding `balance`
    Create {
        account: AccountId,
        balance: Decimal,
    },

    /// Move `amount` from `from` to `to`
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },
}

impl Operation {
    /// The kind of this operation
    pub fn op_type(&self) -> OperationType {
        match self {
            Operation::Create { .. } => OperationType::Create,
            Operation::Transfer { .. } => OperationType::Transfer,
        }
    }

    /// The account this operation is primarily about
    ///
    /// For transfers this is the origin account.
    pub fn account(&self) -> &str {
        match self {
            Operation::Create { account, .. } => account,
            Operation::Transfer { from, .. } => from,
        }
    }
}
