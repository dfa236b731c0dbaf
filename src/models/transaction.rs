//! Transaction domain model and API request types.
//!
//! This module defines:
//! - `TransactionType`: deposit or withdrawal
//! - `Transaction`: an immutable record of one balance change
//! - Request types for recording transactions and for transfers

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Kind of balance change a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
        }
    }
}

/// Only the exact strings `"deposit"` and `"withdrawal"` are accepted.
impl FromStr for TransactionType {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            other => Err(AppError::invalid(format!(
                "unknown transaction type {other:?}"
            ))),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded deposit or withdrawal against one account.
///
/// Created once when the transaction is recorded and never modified after.
/// `account_id` is a plain reference; the service checks the account exists
/// before recording.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "accountId": "550e8400-e29b-41d4-a716-446655440000",
///   "type": "deposit",
///   "amount": 100.0,
///   "timestamp": "2025-12-21T16:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: String,
    account_id: String,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// # Errors
    ///
    /// - `InvalidValue`: `transaction_type` is not a recognized kind, or `amount` is negative
    pub fn new(
        id: impl Into<String>,
        account_id: impl Into<String>,
        transaction_type: &str,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let transaction_type = transaction_type.parse()?;

        if amount < Decimal::ZERO {
            return Err(AppError::invalid("transaction amount must not be negative"));
        }

        Ok(Transaction {
            id: id.into(),
            account_id: account_id.into(),
            transaction_type,
            amount,
            timestamp,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Request to record a deposit or withdrawal.
///
/// # JSON Example
///
/// ```json
/// {
///   "type": "withdrawal",
///   "amount": 25.5
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Request to transfer money between accounts.
///
/// Also returned as the response body of a successful transfer.
///
/// # JSON Example
///
/// ```json
/// {
///   "from_account_id": "550e8400-e29b-41d4-a716-446655440000",
///   "to_account_id": "660e8400-e29b-41d4-a716-446655440001",
///   "amount": 250
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferRequest {
    /// Account to transfer from (will decrease)
    pub from_account_id: String,

    /// Account to transfer to (will increase)
    pub to_account_id: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}
