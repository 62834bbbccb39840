use std::collections::BTreeSet;

use uangkita_core::events::DomainEvent;

/// Distinct identifiers touched by a batch of events.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub loan_ids: BTreeSet<String>,
    pub transaction_ids: BTreeSet<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.loan_ids.is_empty() && self.transaction_ids.is_empty()
    }
}

/// Folds a debounced batch into one change set.
pub fn plan_batch(events: &[DomainEvent]) -> ChangeSet {
    let mut changes = ChangeSet::default();
    for event in events {
        match event {
            DomainEvent::LoansChanged { loan_ids } => {
                changes.loan_ids.extend(loan_ids.iter().cloned());
            }
            DomainEvent::TransactionsChanged { transaction_ids } => {
                changes
                    .transaction_ids
                    .extend(transaction_ids.iter().cloned());
            }
        }
    }
    changes
}
