//! Database models for loans.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use std::str::FromStr;

use crate::errors::StorageError;
use crate::utils::{non_negative, parse_decimal};
use uangkita_core::loans::{Installment, InstallmentStatus, Loan};

/// Database model for loans
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::loans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LoanDB {
    pub id: String,
    pub principal: String,
    pub annual_rate_percent: String,
    pub tenor_months: i32,
    pub origination_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Database model for one installment row, keyed by `(loan_id, id)`
#[derive(
    Queryable, Identifiable, Insertable, Selectable, Associations, PartialEq, Debug, Clone,
)]
#[diesel(belongs_to(LoanDB, foreign_key = loan_id))]
#[diesel(primary_key(loan_id, id))]
#[diesel(table_name = crate::schema::loan_installments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LoanInstallmentDB {
    pub loan_id: String,
    pub id: String,
    pub sequence: i32,
    pub due_date: NaiveDate,
    pub principal_component: String,
    pub interest_component: String,
    pub total_amount: String,
    pub remaining_principal: String,
    pub status: String,
    pub payment_date: Option<NaiveDate>,
    pub proof_reference: Option<String>,
}

impl From<&Loan> for LoanDB {
    fn from(loan: &Loan) -> Self {
        Self {
            id: loan.id.clone(),
            principal: loan.principal.to_string(),
            annual_rate_percent: loan.annual_rate_percent.to_string(),
            tenor_months: loan.tenor_months as i32,
            origination_date: loan.origination_date,
            created_at: loan.created_at,
        }
    }
}

impl LoanInstallmentDB {
    pub fn from_domain(loan_id: &str, installment: &Installment) -> Self {
        Self {
            loan_id: loan_id.to_string(),
            id: installment.id.clone(),
            sequence: installment.sequence as i32,
            due_date: installment.due_date,
            principal_component: installment.principal_component.to_string(),
            interest_component: installment.interest_component.to_string(),
            total_amount: installment.total_amount.to_string(),
            remaining_principal: installment.remaining_principal.to_string(),
            status: installment.status.as_str().to_string(),
            payment_date: installment.payment_date,
            proof_reference: installment.proof_reference.clone(),
        }
    }
}

impl TryFrom<LoanInstallmentDB> for Installment {
    type Error = StorageError;

    fn try_from(db: LoanInstallmentDB) -> Result<Self, Self::Error> {
        let status = InstallmentStatus::from_str(&db.status)
            .map_err(|e| StorageError::CorruptRow(e.to_string()))?;
        Ok(Self {
            sequence: non_negative(db.sequence, "sequence")?,
            due_date: db.due_date,
            principal_component: parse_decimal(&db.principal_component, "principal_component")?,
            interest_component: parse_decimal(&db.interest_component, "interest_component")?,
            total_amount: parse_decimal(&db.total_amount, "total_amount")?,
            remaining_principal: parse_decimal(&db.remaining_principal, "remaining_principal")?,
            status,
            payment_date: db.payment_date,
            proof_reference: db.proof_reference,
            id: db.id,
        })
    }
}

/// Rebuilds a loan from its row and its installment rows (in schedule order).
pub fn loan_from_rows(
    loan: LoanDB,
    installments: Vec<LoanInstallmentDB>,
) -> Result<Loan, StorageError> {
    Ok(Loan {
        principal: parse_decimal(&loan.principal, "principal")?,
        annual_rate_percent: parse_decimal(&loan.annual_rate_percent, "annual_rate_percent")?,
        tenor_months: non_negative(loan.tenor_months, "tenor_months")?,
        origination_date: loan.origination_date,
        installments: installments
            .into_iter()
            .map(Installment::try_from)
            .collect::<Result<Vec<_>, _>>()?,
        created_at: loan.created_at,
        id: loan.id,
    })
}
