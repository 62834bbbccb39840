//! UangKita Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the UangKita personal finance
//! tracker: flat-interest loans with their installment schedules, and the
//! income/expense ledger. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod events;
pub mod loans;
pub mod transactions;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
