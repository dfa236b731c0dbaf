//! Per-account locks spanning a whole read-modify-write.
//!
//! Repository calls are individually atomic, but a service operation is a
//! sequence of them (`get`, mutate the copy, `update_balance`). Holding the
//! account's lock for the full sequence keeps two operations on the same
//! account from both reading the same balance and overwriting each other.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Registry = HashMap<String, Arc<AsyncMutex<()>>>;

/// Registry of account locks shared by every service that mutates balances.
///
/// Entries are created on first use and dropped again once nobody holds or
/// waits on them.
#[derive(Debug, Clone, Default)]
pub struct AccountLocks {
    registry: Arc<Mutex<Registry>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for exclusive access to one account.
    pub async fn lock(&self, account_id: &str) -> AccountGuard {
        let handle = Arc::clone(self.registry().entry(account_id.to_string()).or_default());
        let guard = handle.lock_owned().await;

        AccountGuard {
            locks: self.clone(),
            account_id: account_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Wait for exclusive access to two distinct accounts.
    ///
    /// Locks are always taken in ascending id order, so two transfers running
    /// in opposite directions cannot deadlock. Guards are returned in argument
    /// order.
    pub async fn lock_pair(&self, first: &str, second: &str) -> (AccountGuard, AccountGuard) {
        if first <= second {
            let a = self.lock(first).await;
            let b = self.lock(second).await;
            (a, b)
        } else {
            let b = self.lock(second).await;
            let a = self.lock(first).await;
            (a, b)
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.registry().len()
    }
}

/// Exclusive access to one account; released on drop.
#[derive(Debug)]
pub struct AccountGuard {
    locks: AccountLocks,
    account_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for AccountGuard {
    fn drop(&mut self) {
        // The owned guard keeps its own handle alive; release it first.
        self.guard.take();

        let mut registry = self.locks.registry();
        if let Some(handle) = registry.get(&self.account_id) {
            // Only the registry still references the lock: no holder, no waiter.
            if Arc::strong_count(handle) == 1 {
                registry.remove(&self.account_id);
            }
        }
    }
}
