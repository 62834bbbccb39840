use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use super::transactions_errors::TransactionError;
use super::transactions_export::transactions_to_csv;
use super::transactions_model::{
    checked_total, CategorySummary, CategoryTotal, CategoryTransactions, DashboardSummary,
    MainCategory, MonthlyTotal, NewTransaction, SubCategory, Transaction, TransactionType,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::time_utils::{month_key, now_utc};

pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
        }
    }

    fn sorted(&self, mut transactions: Vec<Transaction>) -> Vec<Transaction> {
        sort_newest_first(&mut transactions);
        transactions
    }
}

/// Orders by date, then by creation time, newest first.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Checks a new transaction and fills in what the caller may leave out.
///
/// Income is always booked as `Pemasukan` without a sub-category.
pub fn normalize_new_transaction(
    mut new_transaction: NewTransaction,
) -> std::result::Result<NewTransaction, TransactionError> {
    if new_transaction.amount <= Decimal::ZERO {
        return Err(TransactionError::InvalidInput(format!(
            "amount must be positive, got {}",
            new_transaction.amount
        )));
    }

    match new_transaction.transaction_type {
        TransactionType::Income => {
            new_transaction.main_category = MainCategory::Income;
            new_transaction.sub_category = SubCategory::None;
        }
        TransactionType::Expense => {
            if new_transaction.main_category == MainCategory::Income {
                return Err(TransactionError::InvalidInput(
                    "expenses cannot be booked as income".to_string(),
                ));
            }
            if !new_transaction
                .main_category
                .allows(new_transaction.sub_category)
            {
                return Err(TransactionError::InvalidInput(format!(
                    "'{}' is not a sub-category of '{}'",
                    new_transaction.sub_category, new_transaction.main_category
                )));
            }
        }
    }

    new_transaction.description = new_transaction.description.trim().to_string();
    Ok(new_transaction)
}

/// Aggregates for the dashboard view.
pub fn dashboard_summary(
    transactions: &[Transaction],
) -> std::result::Result<DashboardSummary, TransactionError> {
    let totals = CategorySummary::from_transactions(transactions)?;

    let mut by_category: HashMap<MainCategory, Decimal> = HashMap::new();
    let mut by_month: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();

    for transaction in transactions {
        let month = by_month
            .entry(month_key(transaction.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        if transaction.is_income() {
            month.0 = checked_total(month.0, transaction.amount)?;
        } else {
            month.1 = checked_total(month.1, transaction.amount)?;
            let category = by_category
                .entry(transaction.main_category)
                .or_insert(Decimal::ZERO);
            *category = checked_total(*category, transaction.amount)?;
        }
    }

    let mut expense_breakdown: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    expense_breakdown.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    let monthly_history = by_month
        .into_iter()
        .map(|(month, (income, expense))| MonthlyTotal {
            month,
            income,
            expense,
        })
        .collect();

    Ok(DashboardSummary {
        total_income: totals.total_income,
        total_expense: totals.total_expense,
        balance: totals.net,
        expense_breakdown,
        monthly_history,
    })
}

#[async_trait::async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let input = normalize_new_transaction(new_transaction)?;
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            transaction_type: input.transaction_type,
            main_category: input.main_category,
            sub_category: input.sub_category,
            amount: input.amount,
            date: input.date,
            description: input.description,
            created_at: now_utc(),
        };
        debug!(
            "Recording {} of {} under {}",
            transaction.transaction_type, transaction.amount, transaction.main_category
        );

        let created = self.repository.create(transaction).await?;
        self.event_sink
            .emit(DomainEvent::transactions_changed(vec![created.id.clone()]));
        Ok(created)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<()> {
        let deleted = self.repository.delete(transaction_id).await?;
        if deleted == 0 {
            return Err(TransactionError::NotFound(transaction_id.to_string()).into());
        }
        self.event_sink
            .emit(DomainEvent::transactions_changed(vec![transaction_id.to_string()]));
        Ok(())
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.sorted(self.repository.list()?))
    }

    fn get_transactions_by_category(
        &self,
        category: MainCategory,
    ) -> Result<CategoryTransactions> {
        let transactions = self.sorted(self.repository.list_by_category(category)?);
        let summary = CategorySummary::from_transactions(&transactions)?;
        Ok(CategoryTransactions {
            category,
            transactions,
            summary,
        })
    }

    fn get_dashboard_summary(&self) -> Result<DashboardSummary> {
        Ok(dashboard_summary(&self.repository.list()?)?)
    }

    fn export_csv(&self) -> Result<String> {
        transactions_to_csv(&self.list_transactions()?)
    }
}
