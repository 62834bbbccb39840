//! Read-through cache in front of a loan repository.

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use std::time::Duration;

use super::loans_model::{InstallmentUpdate, Loan};
use super::loans_traits::LoanRepositoryTrait;
use crate::errors::Result;
use crate::utils::ttl_cache::{Clock, TtlCache};

const ALL_LOANS: &str = "loans";

/// Serves `fetch_all_loans` from memory while the cached copy is fresh.
///
/// Any write drops the cached copy, whether or not the write succeeded.
pub struct CachedLoanRepository {
    inner: Arc<dyn LoanRepositoryTrait>,
    cache: TtlCache<&'static str, Vec<Loan>>,
}

impl CachedLoanRepository {
    pub fn new(inner: Arc<dyn LoanRepositoryTrait>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl, clock),
        }
    }

    pub fn invalidate(&self) {
        self.cache.invalidate(&ALL_LOANS);
    }
}

#[async_trait]
impl LoanRepositoryTrait for CachedLoanRepository {
    async fn persist_loan_create(&self, loan: Loan) -> Result<()> {
        let result = self.inner.persist_loan_create(loan).await;
        self.invalidate();
        result
    }

    async fn persist_installment_update(
        &self,
        loan_id: String,
        update: InstallmentUpdate,
    ) -> Result<()> {
        let result = self.inner.persist_installment_update(loan_id, update).await;
        self.invalidate();
        result
    }

    async fn persist_loan_delete(&self, loan_id: String) -> Result<()> {
        let result = self.inner.persist_loan_delete(loan_id).await;
        self.invalidate();
        result
    }

    async fn fetch_all_loans(&self) -> Result<Vec<Loan>> {
        if let Some(loans) = self.cache.get(&ALL_LOANS) {
            debug!("Serving {} loans from cache", loans.len());
            return Ok(loans);
        }

        let loans = self.inner.fetch_all_loans().await?;
        self.cache.insert(ALL_LOANS, loans.clone());
        Ok(loans)
    }
}
