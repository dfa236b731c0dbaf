//! HTTP router construction.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Build the router with every route and the tracing middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Account management routes
        .route(
            "/accounts",
            post(handlers::accounts::create_account).get(handlers::accounts::list_accounts),
        )
        .route("/accounts/{id}", get(handlers::accounts::get_account))
        // Transaction routes
        .route(
            "/accounts/{id}/transactions",
            post(handlers::transactions::create_transaction)
                .get(handlers::transactions::list_account_transactions),
        )
        .route(
            "/transactions/{id}",
            get(handlers::transactions::get_transaction),
        )
        .route("/transfer", post(handlers::transactions::create_transfer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
