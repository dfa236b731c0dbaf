//! Account domain model and API request types.
//!
//! This module defines:
//! - `Name`: validated owner name
//! - `Account`: a balance-holding entity with the non-negative balance invariant
//! - `CreateAccountRequest`: Request body for creating accounts

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Owner display name.
///
/// The only rule is that the name contains no digit characters. Empty names
/// and names of any length are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();
        if raw.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::invalid("owner name can't contain numbers"));
        }

        Ok(Name(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents an account held by the ledger.
///
/// # Balance Invariant
///
/// `balance >= 0` at all observable times. The only ways to change the
/// balance are [`Account::deposit`] and [`Account::withdraw`], and the latter
/// leaves the balance untouched when it would go negative.
///
/// # Ownership
///
/// The repository owns the authoritative copy. Services work on copies
/// fetched per operation; a mutated copy is lost unless written back with
/// `AccountsRepository::update_balance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: String,
    owner: Name,
    #[serde(with = "rust_decimal::serde::float")]
    balance: Decimal,
}

impl Account {
    /// Build a new account.
    ///
    /// # Errors
    ///
    /// - `InvalidValue`: `initial_balance` is negative or `owner` contains a digit
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<Self, AppError> {
        if initial_balance < Decimal::ZERO {
            return Err(AppError::invalid(
                "the initial balance must not be negative",
            ));
        }

        let owner = Name::new(owner)?;

        Ok(Account {
            id: id.into(),
            owner,
            balance: initial_balance,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> &Name {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Add `amount` to the balance. Never fails; callers pass non-negative
    /// amounts that passed [`Account::check_deposit`].
    pub fn deposit(&mut self, amount: Decimal) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Check that depositing `amount` keeps the balance representable.
    ///
    /// # Errors
    ///
    /// - `InvalidValue`: `balance + amount` overflows
    pub fn check_deposit(&self, amount: Decimal) -> Result<(), AppError> {
        self.balance
            .checked_add(amount)
            .map(|_| ())
            .ok_or_else(|| AppError::invalid("amount overflows balance"))
    }

    /// Subtract `amount` from the balance.
    ///
    /// # Errors
    ///
    /// - `InsufficientBalance`: the result would be negative; the balance is unchanged
    /// - `InvalidValue`: the subtraction overflows
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), AppError> {
        let remaining = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| AppError::invalid("amount overflows balance"))?;
        if remaining < Decimal::ZERO {
            return Err(AppError::InsufficientBalance {
                account_id: self.id.clone(),
            });
        }

        self.balance = remaining;
        Ok(())
    }

    /// Overwrite the balance with a value persisted by a repository.
    pub(crate) fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "owner": "Ada Lovelace",
///   "initial_balance": 100.50
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub owner: String,

    /// Defaults to 0 if not provided
    #[serde(default, with = "rust_decimal::serde::float")]
    pub initial_balance: Decimal,
}
