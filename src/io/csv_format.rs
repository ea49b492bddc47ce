//! CSV format handling for operation records and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger operations
//! - Account output serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Input format
//!
//! ```text
//! type,account,to,amount
//! create,alice,,100.00
//! create,bob,,0
//! transfer,alice,bob,25.5
//! ```
//!
//! Amounts carry at most [`MAX_SCALE`] decimal places, the precision the
//! balances are written with.

use crate::types::{Account, LedgerError, Operation};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Decimal places accepted on input and written on output
pub const MAX_SCALE: u32 = 4;

/// CSV record structure for deserialization
///
/// `to` is only meaningful for transfers. `amount` is the opening balance for
/// creations and the transfer amount for transfers; both require it.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub op_type: String,
    pub account: String,
    pub to: Option<String>,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to an Operation
///
/// This is the request-layer validation step:
/// - the operation type must be `create` or `transfer` (case-insensitive)
/// - the account id must not be empty
/// - amounts must be well-formed decimals with at most `MAX_SCALE` places
/// - creations must state a balance, and it must not be negative
/// - transfers must name a destination and an amount
///
/// Whether a transfer amount is positive is left to the transfer engine.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<Operation, LedgerError> {
    let account = csv_record.account.trim().to_string();
    if account.is_empty() {
        return Err(LedgerError::EmptyAccountId);
    }

    let amount = match csv_record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => Some(parse_amount(amount_str.trim())?),
        _ => None,
    };

    match csv_record.op_type.trim().to_lowercase().as_str() {
        "create" => {
            let balance = amount.ok_or_else(|| LedgerError::missing_amount("create", &account))?;
            if balance < Decimal::ZERO {
                return Err(LedgerError::negative_balance(&account, balance));
            }
            Ok(Operation::Create { account, balance })
        }
        "transfer" => {
            let to = csv_record
                .to
                .map(|to| to.trim().to_string())
                .filter(|to| !to.is_empty())
                .ok_or_else(|| LedgerError::missing_counterparty(&account))?;
            let amount = amount.ok_or_else(|| LedgerError::missing_amount("transfer", &account))?;
            Ok(Operation::Transfer {
                from: account,
                to,
                amount,
            })
        }
        _ => Err(LedgerError::invalid_operation_type(&csv_record.op_type)),
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, LedgerError> {
    let amount = Decimal::from_str(raw).map_err(|_| LedgerError::invalid_decimal(raw))?;
    // Trailing zeros do not count against the limit
    if amount.normalize().scale() > MAX_SCALE {
        return Err(LedgerError::excessive_precision(raw, MAX_SCALE));
    }
    Ok(amount)
}

/// Write account states to CSV format
///
/// Writes accounts with columns `account,balance`, sorted by id, balances
/// rendered with `MAX_SCALE` decimal places. Input amounts are capped at the
/// same scale, so no balance is ever rounded on the way out.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account", "balance"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted_accounts {
        writer.write_record([account.id, format!("{:.*}", MAX_SCALE as usize, account.balance)])?;
    }

    writer.flush()?;
    Ok(())
}
