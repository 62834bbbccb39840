//! Transaction repository and service traits.

use async_trait::async_trait;

use super::transactions_model::{
    CategoryTransactions, DashboardSummary, MainCategory, NewTransaction, Transaction,
};
use crate::errors::Result;

#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Stores a fully formed transaction.
    async fn create(&self, transaction: Transaction) -> Result<Transaction>;

    /// Deletes a transaction by its ID.
    ///
    /// Returns the number of deleted records.
    async fn delete(&self, transaction_id: &str) -> Result<usize>;

    /// Lists every transaction, newest first.
    fn list(&self) -> Result<Vec<Transaction>>;

    /// Lists transactions booked under one main category, newest first.
    fn list_by_category(&self, category: MainCategory) -> Result<Vec<Transaction>>;
}

#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Validates, normalizes and stores a new transaction.
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    async fn delete_transaction(&self, transaction_id: &str) -> Result<()>;

    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    fn get_transactions_by_category(&self, category: MainCategory)
        -> Result<CategoryTransactions>;

    fn get_dashboard_summary(&self) -> Result<DashboardSummary>;

    /// Renders every transaction as CSV, newest first.
    fn export_csv(&self) -> Result<String>;
}
