use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use uangkita_core::transactions::{MainCategory, Transaction, TransactionRepositoryTrait};
use uangkita_core::Result;

use super::model::TransactionDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::transactions;

pub struct TransactionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        TransactionRepository { pool, writer }
    }

    fn load(&self, category: Option<MainCategory>) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .order((transactions::date.desc(), transactions::created_at.desc()))
            .select(TransactionDB::as_select())
            .into_boxed();
        if let Some(category) = category {
            query = query.filter(transactions::main_category.eq(category.label()));
        }

        query
            .load::<TransactionDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<std::result::Result<Vec<_>, StorageError>>()
            .into_core()
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn create(&self, transaction: Transaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                diesel::insert_into(transactions::table)
                    .values(TransactionDB::from(&transaction))
                    .execute(conn)
                    .into_core()?;
                Ok(transaction)
            })
            .await
    }

    async fn delete(&self, transaction_id: &str) -> Result<usize> {
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(transactions::table.find(transaction_id.as_str()))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn list(&self) -> Result<Vec<Transaction>> {
        self.load(None)
    }

    fn list_by_category(&self, category: MainCategory) -> Result<Vec<Transaction>> {
        self.load(Some(category))
    }
}
