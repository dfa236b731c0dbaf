//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - POST /accounts/{id}/transactions - Record a deposit or withdrawal
//! - GET /accounts/{id}/transactions - List an account's transactions
//! - GET /transactions/{id} - Get transaction details
//! - POST /transfer - Move money between accounts

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::AppError,
    models::transaction::{CreateTransactionRequest, Transaction, TransferRequest},
    state::AppState,
};

/// Record a deposit or withdrawal.
///
/// # Request Body
///
/// ```json
/// {
///   "type": "deposit",
///   "amount": 100
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "id": "770e8400-...",
///   "accountId": "550e8400-...",
///   "type": "deposit",
///   "amount": 100.0,
///   "timestamp": "2025-12-21T16:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400: unknown type or non-positive amount
/// - 403: withdrawal exceeds the balance
/// - 404: account not found
pub async fn create_transaction(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let transaction = state
        .transactions
        .save_transaction(&account_id, &request.transaction_type, request.amount)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// List the transactions of an account.
///
/// Returns 404 if the account does not exist, and an empty array if it has
/// no transactions yet.
pub async fn list_account_transactions(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state
        .transactions
        .retrieve_account_transactions(&account_id)
        .await?;

    Ok(Json(transactions))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state.transactions.get_transaction(&transaction_id).await?;

    Ok(Json(transaction))
}

/// Transfer money between accounts.
///
/// # Validation
///
/// - Both accounts must exist
/// - Source must have sufficient balance
/// - Accounts must be different and the amount positive
///
/// On success the request is echoed back with 200 OK.
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferRequest>, AppError> {
    state
        .accounts
        .transfer(
            &request.from_account_id,
            &request.to_account_id,
            request.amount,
        )
        .await?;

    Ok(Json(request))
}
