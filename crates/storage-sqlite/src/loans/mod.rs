//! SQLite storage implementation for loans and their installments.

mod model;
mod repository;

pub use model::{LoanDB, LoanInstallmentDB};
pub use repository::LoanRepository;
