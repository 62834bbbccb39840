//! SQLite storage implementation for UangKita.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `uangkita-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for loans and transactions
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies exist.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod loans;
pub mod transactions;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use loans::LoanRepository;
pub use transactions::TransactionRepository;

// Re-export from uangkita-core for convenience
pub use uangkita_core::errors::{DatabaseError, Error, Result};
