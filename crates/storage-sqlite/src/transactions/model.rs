//! Database models for transactions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use std::str::FromStr;

use crate::errors::StorageError;
use crate::utils::parse_decimal;
use uangkita_core::transactions::{MainCategory, SubCategory, Transaction, TransactionType};

/// Database model for transactions
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub transaction_type: String,
    pub main_category: String,
    pub sub_category: String,
    pub amount: String,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: NaiveDateTime,
}

impl From<&Transaction> for TransactionDB {
    fn from(domain: &Transaction) -> Self {
        Self {
            id: domain.id.clone(),
            transaction_type: domain.transaction_type.as_str().to_string(),
            main_category: domain.main_category.label().to_string(),
            sub_category: domain.sub_category.label().to_string(),
            amount: domain.amount.to_string(),
            date: domain.date,
            description: domain.description.clone(),
            created_at: domain.created_at,
        }
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = StorageError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        let corrupt = |e: uangkita_core::transactions::TransactionError| {
            StorageError::CorruptRow(format!("transaction {}: {}", db.id, e))
        };
        Ok(Self {
            transaction_type: TransactionType::from_str(&db.transaction_type).map_err(corrupt)?,
            main_category: MainCategory::from_str(&db.main_category).map_err(corrupt)?,
            sub_category: SubCategory::from_str(&db.sub_category).map_err(corrupt)?,
            amount: parse_decimal(&db.amount, "amount")?,
            date: db.date,
            description: db.description,
            created_at: db.created_at,
            id: db.id,
        })
    }
}
