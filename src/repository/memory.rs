//! Map-backed repositories.
//!
//! Each repository guards its map with one mutex held for the entire
//! operation, value copy-out included. Nothing ever hands out a reference
//! into the shared map.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{AccountsRepository, TransactionsRepository};
use crate::{
    error::AppError,
    models::{account::Account, transaction::Transaction},
};

#[derive(Debug, Default)]
pub struct InMemoryAccountsRepository {
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryAccountsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // Every write is a single map operation, so a poisoned map is still consistent.
    fn accounts(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountsRepository for InMemoryAccountsRepository {
    async fn create(&self, account: Account) -> Result<(), AppError> {
        let mut accounts = self.accounts();

        if accounts.contains_key(account.id()) {
            return Err(AppError::AccountAlreadyExists {
                account_id: account.id().to_string(),
            });
        }
        accounts.insert(account.id().to_string(), account);

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Account, AppError> {
        self.accounts()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::account_not_found(id))
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.accounts().values().cloned().collect())
    }

    async fn update_balance(&self, id: &str, new_balance: Decimal) -> Result<(), AppError> {
        let mut accounts = self.accounts();

        let account = accounts
            .get_mut(id)
            .ok_or_else(|| AppError::account_not_found(id))?;
        account.set_balance(new_balance);

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTransactionsRepository {
    transactions: Mutex<HashMap<String, Transaction>>,
}

impl InMemoryTransactionsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn transactions(&self) -> MutexGuard<'_, HashMap<String, Transaction>> {
        self.transactions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TransactionsRepository for InMemoryTransactionsRepository {
    async fn save(&self, transaction: Transaction) -> Result<(), AppError> {
        let mut transactions = self.transactions();

        if transactions.contains_key(transaction.id()) {
            return Err(AppError::TransactionAlreadyExists {
                transaction_id: transaction.id().to_string(),
            });
        }
        transactions.insert(transaction.id().to_string(), transaction);

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Transaction, AppError> {
        self.transactions()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::TransactionNotFound {
                transaction_id: id.to_string(),
            })
    }

    async fn find_all_by_account(&self, account_id: &str) -> Result<Vec<Transaction>, AppError> {
        Ok(self
            .transactions()
            .values()
            .filter(|transaction| transaction.account_id() == account_id)
            .cloned()
            .collect())
    }
}
