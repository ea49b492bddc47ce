//! Error types for the ledger
//!
//! This module defines all error types that can occur while opening accounts,
//! moving money and reading operation files.
//!
//! # Error Categories
//!
//! - **Account Errors**: duplicate ids, unknown ids, invalid opening balances
//! - **Transfer Errors**: invalid amounts, insufficient funds, arithmetic overflow
//! - **Input Errors**: I/O failures and malformed operation records
//!
//! Every domain error is raised before any balance is touched, so a failed
//! operation never leaves partial state behind.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// An account with the same id already exists
    ///
    /// The existing account is left untouched.
    #[error("Account id {id} already exists!")]
    DuplicateAccount {
        /// The id that was already taken
        id: String,
    },

    /// The referenced account does not exist
    #[error("Account {id} not found")]
    AccountNotFound {
        /// The id that could not be resolved
        id: String,
    },

    /// Transfer amount is zero or negative
    #[error("Invalid amount {amount}: transfer amount must be greater than zero")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// An operation that moves money arrived without an amount
    #[error("{operation} for account {account} requires an amount")]
    MissingAmount {
        /// Operation that requires an amount
        operation: String,
        /// Account the operation referenced
        account: String,
    },

    /// Origin balance cannot cover the requested amount
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Origin account id
        account: String,
        /// Balance observed inside the critical section
        balance: Decimal,
        /// Requested transfer amount
        requested: Decimal,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account whose balance would overflow
        account: String,
    },

    /// Account id is empty
    #[error("Account id must not be empty")]
    EmptyAccountId,

    /// Opening balance is negative
    #[error("Initial balance {balance} for account {id} must not be negative")]
    NegativeBalance {
        /// Account id
        id: String,
        /// The rejected balance
        balance: Decimal,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed record is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Unknown operation type in the input
    #[error("Invalid operation type '{op_type}'")]
    InvalidOperationType {
        /// The unrecognized type string
        op_type: String,
    },

    /// Transfer record without a destination account
    #[error("transfer from account {account} requires a destination account")]
    MissingCounterparty {
        /// Origin account id
        account: String,
    },

    /// Amount or balance has more decimal places than the ledger writes out
    #[error("Amount '{value}' has more than {max_scale} decimal places")]
    ExcessivePrecision {
        /// The raw field contents
        value: String,
        /// Largest accepted number of decimal places
        max_scale: u32,
    },

    /// Amount or balance field is not a well-formed decimal
    #[error("Invalid decimal value '{value}'")]
    InvalidDecimal {
        /// The raw field contents
        value: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a DuplicateAccount error
    pub fn duplicate_account(id: &str) -> Self {
        LedgerError::DuplicateAccount { id: id.to_string() }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(id: &str) -> Self {
        LedgerError::AccountNotFound { id: id.to_string() }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create a MissingAmount error
    pub fn missing_amount(operation: &str, account: &str) -> Self {
        LedgerError::MissingAmount {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &str, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account: account.to_string(),
            balance,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }

    /// Create a NegativeBalance error
    pub fn negative_balance(id: &str, balance: Decimal) -> Self {
        LedgerError::NegativeBalance {
            id: id.to_string(),
            balance,
        }
    }

    /// Create an InvalidOperationType error
    pub fn invalid_operation_type(op_type: &str) -> Self {
        LedgerError::InvalidOperationType {
            op_type: op_type.to_string(),
        }
    }

    /// Create a MissingCounterparty error
    pub fn missing_counterparty(account: &str) -> Self {
        LedgerError::MissingCounterparty {
            account: account.to_string(),
        }
    }

    /// Create an InvalidDecimal error
    pub fn invalid_decimal(value: &str) -> Self {
        LedgerError::InvalidDecimal {
            value: value.to_string(),
        }
    }

    /// Create an ExcessivePrecision error
    pub fn excessive_precision(value: &str, max_scale: u32) -> Self {
        LedgerError::ExcessivePrecision {
            value: value.to_string(),
            max_scale,
        }
    }

    /// Whether this error is a business-rule rejection rather than bad input
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::DuplicateAccount { .. }
                | LedgerError::AccountNotFound { .. }
                | LedgerError::InvalidAmount { .. }
                | LedgerError::InsufficientFunds { .. }
                | LedgerError::ArithmeticOverflow { .. }
        )
    }
}
