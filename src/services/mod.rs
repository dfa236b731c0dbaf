//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers. They
//! validate input, read current state through the repository traits, compute
//! the new state and write it back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::AppError;

pub mod account_service;
pub mod locks;
pub mod transaction_service;

pub use account_service::AccountService;
pub use locks::AccountLocks;
pub use transaction_service::TransactionService;

/// Source of fresh record ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUID strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Source of transaction timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Amounts moved by a service operation must be strictly positive.
fn ensure_positive(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::invalid("amount must be positive"));
    }

    Ok(())
}
