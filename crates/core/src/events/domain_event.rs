//! Domain event types.

use serde::{Deserialize, Serialize};

/// Facts about committed data changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Loans were created, deleted, or had an installment change status.
    LoansChanged { loan_ids: Vec<String> },

    /// Transactions were recorded or deleted.
    TransactionsChanged { transaction_ids: Vec<String> },
}

impl DomainEvent {
    pub fn loans_changed(loan_ids: Vec<String>) -> Self {
        Self::LoansChanged { loan_ids }
    }

    pub fn transactions_changed(transaction_ids: Vec<String>) -> Self {
        Self::TransactionsChanged { transaction_ids }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::LoansChanged { .. } => "loans_changed",
            DomainEvent::TransactionsChanged { .. } => "transactions_changed",
        }
    }
}
