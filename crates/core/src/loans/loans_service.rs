use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

use super::loans_errors::LoanError;
use super::loans_ledger::{cancel_payment, mark_paid};
use super::loans_model::{
    Installment, InstallmentStatus, InstallmentUpdate, Loan, LoanSummary, NewLoan, PaymentMeta,
};
use super::loans_schedule::generate_schedule;
use super::loans_traits::{LoanRepositoryTrait, LoanServiceTrait};
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::optimistic::OptimisticState;
use crate::utils::time_utils::now_utc;

/// Owner of every loan and its installments.
///
/// Mutations land in the in-memory book first and are then confirmed by the
/// repository. A failed confirmation restores the book to its prior state and
/// surfaces the error; events are emitted only for confirmed mutations.
pub struct LoanService {
    repository: Arc<dyn LoanRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    book: OptimisticState<Vec<Loan>>,
}

impl LoanService {
    /// Creates a service with an empty book.
    pub fn new(
        repository: Arc<dyn LoanRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
            book: OptimisticState::new(Vec::new()),
        }
    }

    /// Creates a service and hydrates it from the repository.
    pub async fn load(
        repository: Arc<dyn LoanRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Result<Self> {
        let service = Self::new(repository, event_sink);
        service.refresh().await?;
        Ok(service)
    }

    async fn change_installment<F>(
        &self,
        loan_id: &str,
        installment_id: &str,
        change: F,
    ) -> Result<Loan>
    where
        F: FnOnce(&mut Loan, &str) -> std::result::Result<Installment, LoanError>,
    {
        let repository = self.repository.clone();

        let (loan, _) = self
            .book
            .apply(
                |loans| {
                    let loan = find_loan_mut(loans, loan_id)?;
                    let installment = change(loan, installment_id)?;
                    Ok((loan.clone(), InstallmentUpdate::from(&installment)))
                },
                |(loan, update): (Loan, InstallmentUpdate)| async move {
                    repository
                        .persist_installment_update(loan.id, update)
                        .await
                },
            )
            .await?;

        debug!(
            "Installment {} of loan {} updated",
            installment_id, loan_id
        );
        self.event_sink
            .emit(DomainEvent::loans_changed(vec![loan.id.clone()]));
        Ok(loan)
    }

    fn find_loan<R>(&self, loan_id: &str, f: impl FnOnce(&Loan) -> R) -> Result<R> {
        self.book
            .read(|loans| loans.iter().find(|loan| loan.id == loan_id).map(f))?
            .ok_or_else(|| LoanError::LoanNotFound(loan_id.to_string()).into())
    }
}

fn find_loan_mut<'a>(
    loans: &'a mut [Loan],
    loan_id: &str,
) -> std::result::Result<&'a mut Loan, LoanError> {
    loans
        .iter_mut()
        .find(|loan| loan.id == loan_id)
        .ok_or_else(|| LoanError::LoanNotFound(loan_id.to_string()))
}

#[async_trait::async_trait]
impl LoanServiceTrait for LoanService {
    async fn create_loan(&self, new_loan: NewLoan) -> Result<Loan> {
        let installments = generate_schedule(
            new_loan.principal,
            new_loan.annual_rate_percent,
            new_loan.tenor_months,
            new_loan.origination_date,
        )?;

        let loan = Loan {
            id: Uuid::new_v4().to_string(),
            principal: new_loan.principal,
            annual_rate_percent: new_loan.annual_rate_percent,
            tenor_months: installments.len() as u32,
            origination_date: new_loan.origination_date,
            installments,
            created_at: now_utc(),
        };
        debug!(
            "Creating loan {} ({} over {} months)",
            loan.id, loan.principal, loan.tenor_months
        );

        let repository = self.repository.clone();
        let created = self
            .book
            .apply(
                move |loans| {
                    loans.insert(0, loan.clone());
                    Ok(loan)
                },
                |loan: Loan| async move { repository.persist_loan_create(loan).await },
            )
            .await?;

        self.event_sink
            .emit(DomainEvent::loans_changed(vec![created.id.clone()]));
        Ok(created)
    }

    async fn set_installment_status(
        &self,
        loan_id: &str,
        installment_id: &str,
        status: InstallmentStatus,
        meta: Option<PaymentMeta>,
    ) -> Result<Loan> {
        match (status, meta) {
            (InstallmentStatus::Paid, Some(meta)) => {
                self.mark_installment_paid(loan_id, installment_id, meta)
                    .await
            }
            (InstallmentStatus::Paid, None) => Err(LoanError::InvalidInput(
                "a payment date is required to mark an installment paid".to_string(),
            )
            .into()),
            (InstallmentStatus::Unpaid, _) => {
                self.cancel_installment_payment(loan_id, installment_id)
                    .await
            }
        }
    }

    async fn mark_installment_paid(
        &self,
        loan_id: &str,
        installment_id: &str,
        meta: PaymentMeta,
    ) -> Result<Loan> {
        self.change_installment(loan_id, installment_id, move |loan, id| {
            mark_paid(loan, id, meta)
        })
        .await
    }

    async fn cancel_installment_payment(
        &self,
        loan_id: &str,
        installment_id: &str,
    ) -> Result<Loan> {
        self.change_installment(loan_id, installment_id, cancel_payment)
            .await
    }

    async fn delete_loan(&self, loan_id: &str) -> Result<()> {
        let repository = self.repository.clone();
        let owned_id = loan_id.to_string();

        self.book
            .apply(
                |loans| {
                    let position = loans
                        .iter()
                        .position(|loan| loan.id == loan_id)
                        .ok_or_else(|| LoanError::LoanNotFound(loan_id.to_string()))?;
                    loans.remove(position);
                    Ok(())
                },
                |_| async move { repository.persist_loan_delete(owned_id).await },
            )
            .await?;

        debug!("Deleted loan {}", loan_id);
        self.event_sink
            .emit(DomainEvent::loans_changed(vec![loan_id.to_string()]));
        Ok(())
    }

    async fn refresh(&self) -> Result<Vec<Loan>> {
        let loans = self.repository.fetch_all_loans().await?;
        self.book.replace(loans.clone()).await?;
        info!("Loaded {} loans", loans.len());
        Ok(loans)
    }

    fn list_loans(&self) -> Result<Vec<Loan>> {
        self.book.read(|loans| loans.clone())
    }

    fn get_loan(&self, loan_id: &str) -> Result<Loan> {
        self.find_loan(loan_id, Loan::clone)
    }

    fn get_loan_summary(&self, loan_id: &str) -> Result<LoanSummary> {
        Ok(self.find_loan(loan_id, Loan::summary)??)
    }

    fn has_outstanding_balance(&self, loan_id: &str) -> Result<bool> {
        self.find_loan(loan_id, Loan::has_outstanding_balance)
    }

    fn has_any_outstanding_balance(&self) -> Result<bool> {
        self.book
            .read(|loans| loans.iter().any(Loan::has_outstanding_balance))
    }
}
