//! Transactions module - the income and expense ledger.

mod transactions_errors;
mod transactions_export;
mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use transactions_errors::TransactionError;
pub use transactions_export::{transactions_to_csv, CSV_HEADER};
pub use transactions_model::*;
pub use transactions_service::{
    dashboard_summary, normalize_new_transaction, sort_newest_first, TransactionService,
};
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
