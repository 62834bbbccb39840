//! Loans module - flat-interest loans, their installment schedules, and the loan store.

mod loans_cache;
mod loans_errors;
mod loans_ledger;
mod loans_model;
mod loans_schedule;
mod loans_service;
mod loans_traits;


pub use loans_cache::CachedLoanRepository;
pub use loans_errors::LoanError;
pub use loans_ledger::{cancel_payment, find_installment, mark_paid, summarize};
pub use loans_model::{
    Installment, InstallmentStatus, InstallmentUpdate, Loan, LoanSummary, NewLoan, PaymentMeta,
};
pub use loans_schedule::{generate_schedule, installment_id, validate_terms};
pub use loans_service::LoanService;
pub use loans_traits::{LoanRepositoryTrait, LoanServiceTrait};
