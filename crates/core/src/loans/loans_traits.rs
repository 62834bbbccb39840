//! Loan repository and service traits.

use async_trait::async_trait;

use super::loans_model::{
    InstallmentStatus, InstallmentUpdate, Loan, LoanSummary, NewLoan, PaymentMeta,
};
use crate::errors::Result;

/// Persistence seam for loans.
///
/// Every write either succeeds or returns [`crate::errors::Error::Persist`];
/// the service keeps its in-memory book consistent with whichever happened.
#[async_trait]
pub trait LoanRepositoryTrait: Send + Sync {
    /// Stores a new loan with its full schedule.
    async fn persist_loan_create(&self, loan: Loan) -> Result<()>;

    /// Stores the status fields of one installment, addressed by `(loan_id, installment_id)`.
    async fn persist_installment_update(
        &self,
        loan_id: String,
        update: InstallmentUpdate,
    ) -> Result<()>;

    /// Removes a loan and all of its installments.
    async fn persist_loan_delete(&self, loan_id: String) -> Result<()>;

    /// Loads every stored loan, newest first.
    async fn fetch_all_loans(&self) -> Result<Vec<Loan>>;
}

/// Loan store operations.
#[async_trait]
pub trait LoanServiceTrait: Send + Sync {
    /// Generates the schedule, records the loan, and persists it.
    ///
    /// Invalid terms are rejected before anything is registered.
    async fn create_loan(&self, new_loan: NewLoan) -> Result<Loan>;

    /// Applies a status change to one installment and returns the updated loan.
    ///
    /// Moving to `paid` requires payment metadata; moving to `unpaid` ignores it.
    async fn set_installment_status(
        &self,
        loan_id: &str,
        installment_id: &str,
        status: InstallmentStatus,
        meta: Option<PaymentMeta>,
    ) -> Result<Loan>;

    async fn mark_installment_paid(
        &self,
        loan_id: &str,
        installment_id: &str,
        meta: PaymentMeta,
    ) -> Result<Loan>;

    async fn cancel_installment_payment(&self, loan_id: &str, installment_id: &str)
        -> Result<Loan>;

    async fn delete_loan(&self, loan_id: &str) -> Result<()>;

    /// Replaces the in-memory book with what the repository holds.
    async fn refresh(&self) -> Result<Vec<Loan>>;

    fn list_loans(&self) -> Result<Vec<Loan>>;

    fn get_loan(&self, loan_id: &str) -> Result<Loan>;

    fn get_loan_summary(&self, loan_id: &str) -> Result<LoanSummary>;

    /// True while the loan has at least one unpaid installment.
    fn has_outstanding_balance(&self, loan_id: &str) -> Result<bool>;

    /// True while any registered loan has an unpaid installment.
    fn has_any_outstanding_balance(&self) -> Result<bool>;
}
