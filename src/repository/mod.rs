//! Storage contracts for accounts and transactions.
//!
//! Services only ever talk to these traits. Any backend (the in-memory one in
//! [`memory`], a database, a file store) can be swapped in without touching the
//! services, provided each call is atomic with respect to other calls on the
//! same repository.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    error::AppError,
    models::{account::Account, transaction::Transaction},
};

/// In-memory reference backend
pub mod memory;
#[cfg(test)]
pub(crate) mod testing;

#[async_trait]
pub trait AccountsRepository: Send + Sync {
    /// Store a new account.
    ///
    /// # Errors
    ///
    /// - `AccountAlreadyExists`: the id is taken; the stored account is not overwritten
    async fn create(&self, account: Account) -> Result<(), AppError>;

    /// Return a copy of the account.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound`
    async fn get(&self, id: &str) -> Result<Account, AppError>;

    /// Every stored account, empty when there are none.
    async fn list(&self) -> Result<Vec<Account>, AppError>;

    /// Replace the stored balance. The existence check and the write happen
    /// as one atomic step.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound`
    async fn update_balance(&self, id: &str, new_balance: Decimal) -> Result<(), AppError>;
}

#[async_trait]
pub trait TransactionsRepository: Send + Sync {
    /// # Errors
    ///
    /// - `TransactionAlreadyExists`: the id is taken
    async fn save(&self, transaction: Transaction) -> Result<(), AppError>;

    /// # Errors
    ///
    /// - `TransactionNotFound`
    async fn get(&self, id: &str) -> Result<Transaction, AppError>;

    /// Transactions recorded against `account_id`, in no particular order.
    async fn find_all_by_account(&self, account_id: &str) -> Result<Vec<Transaction>, AppError>;
}
