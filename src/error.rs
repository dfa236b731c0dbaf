//! Error types and HTTP error response handling.
//!
//! Every fallible operation in the ledger returns [`AppError`]. Domain
//! constructors, repositories and services all share it, and the HTTP layer
//! converts it into a JSON error body with a matching status code.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Validation Errors**: malformed input (`InvalidValue`)
/// - **Resource Errors**: referenced account or transaction is absent
/// - **Conflict Errors**: id collision on create
/// - **Business Logic Errors**: a withdrawal that exceeds the balance
/// - **Persistence Errors**: one or both balance writes of a transfer failed
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input failed validation (digit in an owner name, negative initial
    /// balance, unknown transaction type, non-positive amount).
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Returns HTTP 404 Not Found.
    #[error("account with id {account_id:?} not found")]
    AccountNotFound { account_id: String },

    /// Returns HTTP 404 Not Found.
    #[error("transaction with id {transaction_id:?} not found")]
    TransactionNotFound { transaction_id: String },

    #[error("account with id {account_id:?} already exists")]
    AccountAlreadyExists { account_id: String },

    #[error("transaction with id {transaction_id:?} already exists")]
    TransactionAlreadyExists { transaction_id: String },

    /// A withdrawal would leave the account with a negative balance.
    ///
    /// Returns HTTP 403 Forbidden. No state is mutated when this is returned.
    #[error("balance for account with id {account_id:?} is insufficient")]
    InsufficientBalance { account_id: String },

    /// At least one of the independent balance writes of a transfer failed.
    ///
    /// Writes that succeeded are kept; every failed write is listed.
    #[error("updating balances: {}", join_failures(.0))]
    BalancePersistence(Vec<PersistenceFailure>),
}

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidValue(msg.into())
    }

    pub fn account_not_found(account_id: impl Into<String>) -> Self {
        AppError::AccountNotFound {
            account_id: account_id.into(),
        }
    }

    /// Machine readable code used in the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidValue(_) => "invalid_value",
            AppError::AccountNotFound { .. } => "account_not_found",
            AppError::TransactionNotFound { .. } => "transaction_not_found",
            AppError::AccountAlreadyExists { .. } => "account_already_exists",
            AppError::TransactionAlreadyExists { .. } => "transaction_already_exists",
            AppError::InsufficientBalance { .. } => "insufficient_balance",
            AppError::BalancePersistence(_) => "balance_persistence",
        }
    }
}

/// Which side of a transfer a failed balance write belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSide {
    Source,
    Destination,
}

impl fmt::Display for TransferSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferSide::Source => f.write_str("source"),
            TransferSide::Destination => f.write_str("destination"),
        }
    }
}

/// A single failed balance write inside [`AppError::BalancePersistence`].
#[derive(Debug)]
pub struct PersistenceFailure {
    pub side: TransferSide,
    pub account_id: String,
    pub error: AppError,
}

impl fmt::Display for PersistenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "updating {} account {:?} balance: {}",
            self.side, self.account_id, self.error
        )
    }
}

fn join_failures(failures: &[PersistenceFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convert AppError into an HTTP response.
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidValue` → 400 Bad Request
/// - `AccountNotFound`, `TransactionNotFound` → 404 Not Found
/// - `InsufficientBalance` → 403 Forbidden
/// - anything else → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            AppError::AccountNotFound { .. } | AppError::TransactionNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            AppError::InsufficientBalance { .. } => StatusCode::FORBIDDEN,
            AppError::AccountAlreadyExists { .. }
            | AppError::TransactionAlreadyExists { .. }
            | AppError::BalancePersistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal server error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
