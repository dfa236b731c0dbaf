//! Test doubles for exercising failure paths of the services.

use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{
    AccountsRepository, TransactionsRepository,
    memory::{InMemoryAccountsRepository, InMemoryTransactionsRepository},
};
use crate::{
    error::AppError,
    models::{account::Account, transaction::Transaction},
    services::{Clock, IdGenerator},
};

/// In-memory accounts whose balance writes fail for selected ids, as if the
/// account vanished between read and write.
#[derive(Debug, Default)]
pub struct FailingAccountsRepository {
    inner: InMemoryAccountsRepository,
    failing: Mutex<HashSet<String>>,
}

impl FailingAccountsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_updates_for(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }
}

#[async_trait]
impl AccountsRepository for FailingAccountsRepository {
    async fn create(&self, account: Account) -> Result<(), AppError> {
        self.inner.create(account).await
    }

    async fn get(&self, id: &str) -> Result<Account, AppError> {
        self.inner.get(id).await
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        self.inner.list().await
    }

    async fn update_balance(&self, id: &str, new_balance: Decimal) -> Result<(), AppError> {
        let fails = self.failing.lock().unwrap().contains(id);
        if fails {
            return Err(AppError::account_not_found(id));
        }
        self.inner.update_balance(id, new_balance).await
    }
}

/// In-memory transactions whose `save` can be switched to fail.
#[derive(Debug, Default)]
pub struct FailingTransactionsRepository {
    inner: InMemoryTransactionsRepository,
    fail_saves: AtomicBool,
}

impl FailingTransactionsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TransactionsRepository for FailingTransactionsRepository {
    async fn save(&self, transaction: Transaction) -> Result<(), AppError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::TransactionAlreadyExists {
                transaction_id: transaction.id().to_string(),
            });
        }
        self.inner.save(transaction).await
    }

    async fn get(&self, id: &str) -> Result<Transaction, AppError> {
        self.inner.get(id).await
    }

    async fn find_all_by_account(&self, account_id: &str) -> Result<Vec<Transaction>, AppError> {
        self.inner.find_all_by_account(account_id).await
    }
}

/// Always hands out the same id.
#[derive(Debug)]
pub struct FixedIdGenerator(String);

impl FixedIdGenerator {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl IdGenerator for FixedIdGenerator {
    fn next_id(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
