//! Loan domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::loans_errors::LoanError;

/// Payment state of a single installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallmentStatus::Unpaid => "unpaid",
            InstallmentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallmentStatus {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(InstallmentStatus::Unpaid),
            "paid" => Ok(InstallmentStatus::Paid),
            other => Err(LoanError::InvalidInput(format!(
                "unknown installment status '{}'",
                other
            ))),
        }
    }
}

/// One scheduled payment within a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    /// Unique within the owning loan.
    pub id: String,
    /// 1-based position in the schedule.
    pub sequence: u32,
    pub due_date: NaiveDate,
    pub principal_component: Decimal,
    pub interest_component: Decimal,
    pub total_amount: Decimal,
    /// Outstanding principal once this installment is paid.
    pub remaining_principal: Decimal,
    pub status: InstallmentStatus,
    pub payment_date: Option<NaiveDate>,
    pub proof_reference: Option<String>,
}

impl Installment {
    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }
}

/// One borrowing instance together with its full installment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    pub principal: Decimal,
    pub annual_rate_percent: Decimal,
    pub tenor_months: u32,
    pub origination_date: NaiveDate,
    pub installments: Vec<Installment>,
    pub created_at: NaiveDateTime,
}

impl Loan {
    pub fn summary(&self) -> Result<LoanSummary, LoanError> {
        super::loans_ledger::summarize(&self.installments)
    }

    /// True while at least one installment is still unpaid.
    pub fn has_outstanding_balance(&self) -> bool {
        self.installments.iter().any(|i| !i.is_paid())
    }
}

/// Input model for creating a new loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub principal: Decimal,
    pub annual_rate_percent: Decimal,
    pub tenor_months: i32,
    pub origination_date: NaiveDate,
}

/// Metadata recorded when an installment is paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMeta {
    pub payment_date: NaiveDate,
    pub proof_reference: Option<String>,
}

impl PaymentMeta {
    pub fn on(payment_date: NaiveDate) -> Self {
        Self {
            payment_date,
            proof_reference: None,
        }
    }
}

/// The persisted slice of an installment that status transitions touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentUpdate {
    pub installment_id: String,
    pub status: InstallmentStatus,
    pub payment_date: Option<NaiveDate>,
    pub proof_reference: Option<String>,
}

impl From<&Installment> for InstallmentUpdate {
    fn from(installment: &Installment) -> Self {
        Self {
            installment_id: installment.id.clone(),
            status: installment.status,
            payment_date: installment.payment_date,
            proof_reference: installment.proof_reference.clone(),
        }
    }
}

/// Derived view over a loan's installments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub total_paid: Decimal,
    pub total_unpaid: Decimal,
    /// `total_paid / (total_paid + total_unpaid) * 100`, zero when nothing is owed.
    pub percent_paid: Decimal,
    pub paid_count: usize,
    pub installment_count: usize,
}
