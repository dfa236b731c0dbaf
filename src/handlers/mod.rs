//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params)
//! 2. Calls the account or transaction service
//! 3. Returns HTTP response (JSON, status code)

/// Account management endpoints
pub mod accounts;
/// Service health endpoint
pub mod health;
/// Deposit, withdrawal and transfer endpoints
pub mod transactions;
