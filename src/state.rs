//! Shared application state handed to every HTTP handler.

use std::sync::Arc;

use crate::{
    repository::{
        AccountsRepository, TransactionsRepository,
        memory::{InMemoryAccountsRepository, InMemoryTransactionsRepository},
    },
    services::{AccountLocks, AccountService, TransactionService},
};

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub transactions: TransactionService,
}

impl AppState {
    /// Wire both services to the given repositories and one shared lock registry.
    pub fn new(
        accounts: Arc<dyn AccountsRepository>,
        transactions: Arc<dyn TransactionsRepository>,
    ) -> Self {
        let locks = AccountLocks::new();

        Self {
            accounts: AccountService::new(accounts.clone(), locks.clone()),
            transactions: TransactionService::new(accounts, transactions, locks),
        }
    }

    /// State backed by empty in-memory repositories.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryAccountsRepository::new()),
            Arc::new(InMemoryTransactionsRepository::new()),
        )
    }
}
