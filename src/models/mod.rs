//! Domain models.
//!
//! Pure validation and state-mutation logic, no I/O.

/// Account and owner name model
pub mod account;
/// Deposit and withdrawal records
pub mod transaction;
