//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /accounts - Create new account
//! - GET /accounts/{id} - Get account by ID
//! - GET /accounts - List all accounts

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::AppError,
    models::account::{Account, CreateAccountRequest},
    state::AppState,
};

/// Create a new account.
///
/// # Request Body
///
/// ```json
/// {
///   "owner": "Ada Lovelace",
///   "initial_balance": 100
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created account
/// - **Error (400)**: Owner contains a digit or the balance is negative
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "owner": "Ada Lovelace",
///   "balance": 100.0
/// }
/// ```
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state
        .accounts
        .create_account(&request.owner, request.initial_balance)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Get a specific account by ID.
///
/// - **Success (200 OK)**: Returns account details
/// - **Error (404)**: Account not found
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<Account>, AppError> {
    let account = state.accounts.get_account(&account_id).await?;

    Ok(Json(account))
}

/// List all accounts.
///
/// Always 200 OK; the array is empty when no account exists. No ordering is
/// guaranteed.
pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = state.accounts.list_accounts().await?;

    Ok(Json(accounts))
}
