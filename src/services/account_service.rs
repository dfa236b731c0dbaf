//! Account service - account lifecycle and transfers.
//!
//! This service handles:
//! - Account creation with fresh ids
//! - Account lookup and listing
//! - Transfers between two accounts
//!
//! # Transfer Guarantees
//!
//! Validation is atomic: both account locks are held while the accounts are
//! read, the withdrawal is checked and both balances are written, so a
//! transfer never acts on a stale balance. Persistence is not: the two balance
//! writes are independent, a failed write is reported together with any other
//! failure, and a write that succeeded is kept.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::{AccountLocks, IdGenerator, UuidGenerator, ensure_positive};
use crate::{
    error::{AppError, PersistenceFailure, TransferSide},
    models::account::Account,
    repository::AccountsRepository,
};

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountsRepository>,
    locks: AccountLocks,
    ids: Arc<dyn IdGenerator>,
}

impl AccountService {
    /// `locks` must be the same registry the transaction service uses.
    pub fn new(accounts: Arc<dyn AccountsRepository>, locks: AccountLocks) -> Self {
        Self {
            accounts,
            locks,
            ids: Arc::new(UuidGenerator),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Create and persist a new account.
    ///
    /// # Errors
    ///
    /// - `InvalidValue`: owner contains a digit or the initial balance is negative
    /// - `AccountAlreadyExists`: the generated id is already taken
    pub async fn create_account(
        &self,
        owner: &str,
        initial_balance: Decimal,
    ) -> Result<Account, AppError> {
        let id = self.ids.next_id();
        self.ensure_unused(&id).await?;

        let account = Account::new(id, owner, initial_balance)?;
        self.accounts.create(account.clone()).await?;

        tracing::info!(
            account_id = %account.id(),
            owner = %account.owner(),
            initial_balance = %account.balance(),
            "New account created"
        );

        Ok(account)
    }

    pub async fn get_account(&self, id: &str) -> Result<Account, AppError> {
        let account = self.accounts.get(id).await?;

        tracing::debug!(
            account_id = %id,
            owner = %account.owner(),
            balance = %account.balance(),
            "Returning account"
        );

        Ok(account)
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let accounts = self.accounts.list().await?;

        tracing::debug!(total_accounts = accounts.len(), "Returning accounts list");

        Ok(accounts)
    }

    /// Move `amount` from `source_id` to `destination_id`.
    ///
    /// # Process
    ///
    /// 1. Lock both accounts (ascending id order)
    /// 2. Fetch source, then destination
    /// 3. Withdraw from the source copy; abort with no writes if insufficient
    /// 4. Deposit into the destination copy; abort with no writes on overflow
    /// 5. Write both balances concurrently and collect every failure
    ///
    /// # Errors
    ///
    /// - `InvalidValue`: amount is not positive, source and destination are the
    ///   same, or the destination balance would overflow; nothing is written
    /// - `AccountNotFound`: either account is missing; nothing is written
    /// - `InsufficientBalance`: source balance is lower than `amount`; nothing is written
    /// - `BalancePersistence`: one or both balance writes failed
    pub async fn transfer(
        &self,
        source_id: &str,
        destination_id: &str,
        amount: Decimal,
    ) -> Result<(), AppError> {
        ensure_positive(amount)?;
        if source_id == destination_id {
            return Err(AppError::invalid("cannot transfer to the same account"));
        }

        let _guards = self.locks.lock_pair(source_id, destination_id).await;

        let mut source = self.accounts.get(source_id).await?;
        let mut destination = self.accounts.get(destination_id).await?;

        source.withdraw(amount)?;
        destination.check_deposit(amount)?;
        destination.deposit(amount);

        let (source_write, destination_write) = tokio::join!(
            self.accounts.update_balance(source.id(), source.balance()),
            self.accounts
                .update_balance(destination.id(), destination.balance()),
        );

        let failures: Vec<PersistenceFailure> = [
            (TransferSide::Source, source.id(), source_write),
            (TransferSide::Destination, destination.id(), destination_write),
        ]
        .into_iter()
        .filter_map(|(side, account_id, result)| {
            result.err().map(|error| PersistenceFailure {
                side,
                account_id: account_id.to_string(),
                error,
            })
        })
        .collect();

        if !failures.is_empty() {
            let err = AppError::BalancePersistence(failures);
            tracing::warn!(
                source_id,
                destination_id,
                amount = %amount,
                error = %err,
                "Transfer persisted partially"
            );
            return Err(err);
        }

        tracing::info!(source_id, destination_id, amount = %amount, "Transfer completed");

        Ok(())
    }

    /// Fails with `AccountAlreadyExists` if `id` is already taken.
    async fn ensure_unused(&self, id: &str) -> Result<(), AppError> {
        match self.accounts.get(id).await {
            Err(AppError::AccountNotFound { .. }) => Ok(()),
            Err(err) => Err(err),
            Ok(_) => Err(AppError::AccountAlreadyExists {
                account_id: id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::repository::{
        memory::InMemoryAccountsRepository,
        testing::{FailingAccountsRepository, FixedIdGenerator},
    };

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn service() -> (AccountService, Arc<InMemoryAccountsRepository>) {
        let repo = Arc::new(InMemoryAccountsRepository::new());
        let service = AccountService::new(repo.clone(), AccountLocks::new());
        (service, repo)
    }

    async fn balance_of(repo: &dyn AccountsRepository, id: &str) -> Decimal {
        repo.get(id).await.unwrap().balance()
    }

    #[tokio::test]
    async fn create_account_persists_valid_account() {
        let (service, repo) = service();

        let account = service
            .create_account("Test User", Decimal::new(4250, 2))
            .await
            .unwrap();

        assert_eq!(account.owner().as_str(), "Test User");
        assert_eq!(account.balance(), Decimal::new(4250, 2));
        assert_eq!(repo.get(account.id()).await.unwrap(), account);
    }

    #[tokio::test]
    async fn create_account_rejects_invalid_input() {
        let (service, repo) = service();

        for (owner, balance) in [("123", dec(10)), ("Test User", dec(-100))] {
            let err = service.create_account(owner, balance).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidValue(_)), "{owner} {balance}");
        }
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_account_reports_id_collision() {
        let repo = Arc::new(InMemoryAccountsRepository::new());
        let service = AccountService::new(repo.clone(), AccountLocks::new())
            .with_id_generator(Arc::new(FixedIdGenerator::new("fixed")));

        service.create_account("First", dec(1)).await.unwrap();
        let err = service.create_account("Second", dec(2)).await.unwrap_err();

        assert!(matches!(err, AppError::AccountAlreadyExists { account_id } if account_id == "fixed"));
        assert_eq!(
            repo.get("fixed").await.unwrap().owner().as_str(),
            "First"
        );
    }

    #[tokio::test]
    async fn get_and_list_accounts() {
        let (service, _) = service();
        assert!(service.list_accounts().await.unwrap().is_empty());

        let a = service.create_account("Alice", dec(1)).await.unwrap();
        let b = service.create_account("Bob", dec(2)).await.unwrap();

        assert_eq!(service.get_account(a.id()).await.unwrap(), a);
        assert!(matches!(
            service.get_account("missing").await,
            Err(AppError::AccountNotFound { account_id }) if account_id == "missing"
        ));

        let mut listed = service.list_accounts().await.unwrap();
        listed.sort_by(|x, y| x.owner().as_str().cmp(y.owner().as_str()));
        assert_eq!(listed, vec![a, b]);
    }

    #[tokio::test]
    async fn transfer_moves_full_amount() {
        let (service, repo) = service();
        let a = service.create_account("Alice", dec(100)).await.unwrap();
        let b = service.create_account("Bob", dec(100)).await.unwrap();

        service.transfer(a.id(), b.id(), dec(100)).await.unwrap();

        assert_eq!(balance_of(repo.as_ref(), a.id()).await, Decimal::ZERO);
        assert_eq!(balance_of(repo.as_ref(), b.id()).await, dec(200));
    }

    #[tokio::test]
    async fn transfer_from_missing_source_changes_nothing() {
        let (service, repo) = service();
        let b = service.create_account("Bob", dec(100)).await.unwrap();

        let err = service
            .transfer("missing", b.id(), dec(100))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AccountNotFound { account_id } if account_id == "missing"));
        assert_eq!(balance_of(repo.as_ref(), b.id()).await, dec(100));
    }

    #[tokio::test]
    async fn transfer_to_missing_destination_changes_nothing() {
        let (service, repo) = service();
        let a = service.create_account("Alice", dec(100)).await.unwrap();

        let err = service
            .transfer(a.id(), "missing", dec(10))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AccountNotFound { account_id } if account_id == "missing"));
        assert_eq!(balance_of(repo.as_ref(), a.id()).await, dec(100));
    }

    #[tokio::test]
    async fn transfer_with_insufficient_funds_changes_nothing() {
        let (service, repo) = service();
        let a = service.create_account("Alice", dec(100)).await.unwrap();
        let b = service.create_account("Bob", dec(100)).await.unwrap();

        let err = service.transfer(a.id(), b.id(), dec(101)).await.unwrap_err();

        assert!(matches!(err, AppError::InsufficientBalance { account_id } if account_id == a.id()));
        assert_eq!(balance_of(repo.as_ref(), a.id()).await, dec(100));
        assert_eq!(balance_of(repo.as_ref(), b.id()).await, dec(100));
    }

    #[tokio::test]
    async fn transfer_overflowing_destination_changes_nothing() {
        let (service, repo) = service();
        let a = service.create_account("Alice", dec(100)).await.unwrap();
        let b = service.create_account("Bob", Decimal::MAX).await.unwrap();

        let err = service.transfer(a.id(), b.id(), Decimal::ONE).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidValue(_)));
        assert_eq!(balance_of(repo.as_ref(), a.id()).await, dec(100));
        assert_eq!(balance_of(repo.as_ref(), b.id()).await, Decimal::MAX);
    }

    #[tokio::test]
    async fn transfer_rejects_bad_amount_and_self_transfer() {
        let (service, repo) = service();
        let a = service.create_account("Alice", dec(100)).await.unwrap();
        let b = service.create_account("Bob", dec(100)).await.unwrap();

        for amount in [Decimal::ZERO, dec(-5)] {
            let err = service.transfer(a.id(), b.id(), amount).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidValue(_)));
        }
        let err = service.transfer(a.id(), a.id(), dec(5)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidValue(_)));

        assert_eq!(balance_of(repo.as_ref(), a.id()).await, dec(100));
        assert_eq!(balance_of(repo.as_ref(), b.id()).await, dec(100));
    }

    #[tokio::test]
    async fn failed_destination_write_is_reported_and_source_kept() {
        let repo = Arc::new(FailingAccountsRepository::new());
        let service = AccountService::new(repo.clone(), AccountLocks::new());
        let a = service.create_account("Alice", dec(100)).await.unwrap();
        let b = service.create_account("Bob", dec(100)).await.unwrap();
        repo.fail_updates_for(b.id());

        let err = service.transfer(a.id(), b.id(), dec(40)).await.unwrap_err();

        let AppError::BalancePersistence(failures) = &err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].side, TransferSide::Destination);
        assert_eq!(failures[0].account_id, b.id());
        assert!(matches!(failures[0].error, AppError::AccountNotFound { .. }));

        // No rollback of the write that went through.
        assert_eq!(balance_of(repo.as_ref(), a.id()).await, dec(60));
        assert_eq!(balance_of(repo.as_ref(), b.id()).await, dec(100));
    }

    #[tokio::test]
    async fn both_failed_writes_are_reported() {
        let repo = Arc::new(FailingAccountsRepository::new());
        let service = AccountService::new(repo.clone(), AccountLocks::new());
        let a = service.create_account("Alice", dec(100)).await.unwrap();
        let b = service.create_account("Bob", dec(100)).await.unwrap();
        repo.fail_updates_for(a.id());
        repo.fail_updates_for(b.id());

        let err = service.transfer(a.id(), b.id(), dec(40)).await.unwrap_err();

        let AppError::BalancePersistence(failures) = &err else {
            panic!("unexpected error: {err:?}");
        };
        let sides: Vec<_> = failures.iter().map(|f| f.side).collect();
        assert_eq!(sides, [TransferSide::Source, TransferSide::Destination]);

        let msg = err.to_string();
        assert!(msg.contains(a.id()) && msg.contains(b.id()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn opposing_transfers_keep_totals() {
        let (service, repo) = service();
        let a = service.create_account("Alice", dec(100)).await.unwrap();
        let b = service.create_account("Bob", dec(100)).await.unwrap();

        let tasks: Vec<_> = (0..100)
            .map(|i| {
                let service = service.clone();
                let (from, to) = if i % 2 == 0 {
                    (a.id().to_string(), b.id().to_string())
                } else {
                    (b.id().to_string(), a.id().to_string())
                };
                tokio::spawn(async move { service.transfer(&from, &to, Decimal::ONE).await })
            })
            .collect();

        for task in tasks {
            tokio::time::timeout(Duration::from_secs(5), task)
                .await
                .unwrap()
                .unwrap()
                .unwrap();
        }

        assert_eq!(balance_of(repo.as_ref(), a.id()).await, dec(100));
        assert_eq!(balance_of(repo.as_ref(), b.id()).await, dec(100));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_transfers_never_overdraw() {
        let (service, repo) = service();
        let source = service.create_account("Alice", dec(100)).await.unwrap();
        let destination = service.create_account("Bob", Decimal::ZERO).await.unwrap();

        let tasks: Vec<_> = (0..30)
            .map(|_| {
                let service = service.clone();
                let (from, to) = (source.id().to_string(), destination.id().to_string());
                tokio::spawn(async move { service.transfer(&from, &to, dec(10)).await })
            })
            .collect();

        let mut succeeded = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => succeeded += 1,
                Err(AppError::InsufficientBalance { .. }) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(succeeded, 10);
        assert_eq!(balance_of(repo.as_ref(), source.id()).await, Decimal::ZERO);
        assert_eq!(balance_of(repo.as_ref(), destination.id()).await, dec(100));
    }
}
