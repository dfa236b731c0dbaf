//! Ledger Service
//!
//! A minimal ledger: accounts with an owner and a non-negative balance, and
//! deposits, withdrawals and transfers recorded against them.
//!
//! # Architecture
//!
//! - **Domain model** ([`models`]): validation and balance mutation, no I/O
//! - **Repositories** ([`repository`]): storage contracts plus an in-memory backend
//! - **Services** ([`services`]): account creation, transfers, transaction recording
//! - **HTTP** ([`handlers`], [`app`]): Axum routes over the services
//!
//! # Concurrency
//!
//! Every repository call is atomic on its own. Services additionally hold a
//! per-account lock for the whole read-modify-write of a balance, so
//! concurrent operations on the same account never lose an update and a
//! balance never goes negative.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;
