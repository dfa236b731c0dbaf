//! Transaction service - deposits and withdrawals.
//!
//! This service handles:
//! - Recording a deposit or withdrawal and applying it to the account balance
//! - Listing the transactions of an account
//! - Looking up a single transaction
//!
//! The account lock is held from reading the account until both the balance
//! and the transaction record are written. The two writes are still separate:
//! if saving the record fails after the balance was updated, the balance change
//! stays and has no history entry.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::{AccountLocks, Clock, IdGenerator, SystemClock, UuidGenerator, ensure_positive};
use crate::{
    error::AppError,
    models::transaction::{Transaction, TransactionType},
    repository::{AccountsRepository, TransactionsRepository},
};

#[derive(Clone)]
pub struct TransactionService {
    accounts: Arc<dyn AccountsRepository>,
    transactions: Arc<dyn TransactionsRepository>,
    locks: AccountLocks,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl TransactionService {
    /// `locks` must be the same registry the account service uses.
    pub fn new(
        accounts: Arc<dyn AccountsRepository>,
        transactions: Arc<dyn TransactionsRepository>,
        locks: AccountLocks,
    ) -> Self {
        Self {
            accounts,
            transactions,
            locks,
            ids: Arc::new(UuidGenerator),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Record a deposit or withdrawal against `account_id`.
    ///
    /// # Process
    ///
    /// 1. Build the transaction (fresh id, current time, validated type)
    /// 2. Lock and fetch the account
    /// 3. Apply the deposit or withdrawal to the account copy
    /// 4. Persist the new balance, then the transaction record
    ///
    /// # Errors
    ///
    /// - `InvalidValue`: unknown type, non-positive amount, or a deposit that
    ///   would overflow the balance; nothing is written
    /// - `AccountNotFound`: the account does not exist
    /// - `InsufficientBalance`: withdrawal exceeds the balance; nothing is written
    pub async fn save_transaction(
        &self,
        account_id: &str,
        transaction_type: &str,
        amount: Decimal,
    ) -> Result<Transaction, AppError> {
        let transaction = Transaction::new(
            self.ids.next_id(),
            account_id,
            transaction_type,
            amount,
            self.clock.now(),
        )?;
        ensure_positive(amount)?;

        let _guard = self.locks.lock(account_id).await;

        let mut account = self.accounts.get(account_id).await?;
        match transaction.transaction_type() {
            TransactionType::Deposit => {
                account.check_deposit(amount)?;
                account.deposit(amount);
            }
            TransactionType::Withdrawal => account.withdraw(amount)?,
        }

        self.accounts
            .update_balance(account_id, account.balance())
            .await?;

        if let Err(err) = self.transactions.save(transaction.clone()).await {
            tracing::error!(
                account_id,
                transaction_id = %transaction.id(),
                error = %err,
                "Balance updated but transaction record not saved"
            );
            return Err(err);
        }

        tracing::info!(
            account_id,
            transaction_id = %transaction.id(),
            transaction_type = %transaction.transaction_type(),
            amount = %amount,
            balance = %account.balance(),
            "Transaction recorded"
        );

        Ok(transaction)
    }

    /// Every transaction of an existing account, in no particular order.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound`
    pub async fn retrieve_account_transactions(
        &self,
        account_id: &str,
    ) -> Result<Vec<Transaction>, AppError> {
        self.accounts.get(account_id).await?;

        let transactions = self.transactions.find_all_by_account(account_id).await?;

        tracing::debug!(
            account_id,
            total_transactions = transactions.len(),
            "Returning account transactions"
        );

        Ok(transactions)
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Transaction, AppError> {
        self.transactions.get(id).await
    }
}
