//! Income and expense transaction models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transactions_errors::TransactionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(TransactionError::InvalidInput(format!(
                "unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// Top-level budget bucket. Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MainCategory {
    #[serde(rename = "Pemasukan")]
    Income,
    #[serde(rename = "Angsuran KPR")]
    Mortgage,
    #[serde(rename = "Kebutuhan Harian")]
    Daily,
    #[serde(rename = "Dana Darurat")]
    Emergency,
    #[serde(rename = "Investasi")]
    Investment,
    #[serde(rename = "Dana Sosial/Cadangan")]
    Social,
    #[serde(rename = "Pinjaman")]
    Loan,
}

impl MainCategory {
    pub const ALL: [MainCategory; 7] = [
        MainCategory::Income,
        MainCategory::Mortgage,
        MainCategory::Daily,
        MainCategory::Emergency,
        MainCategory::Investment,
        MainCategory::Social,
        MainCategory::Loan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MainCategory::Income => "Pemasukan",
            MainCategory::Mortgage => "Angsuran KPR",
            MainCategory::Daily => "Kebutuhan Harian",
            MainCategory::Emergency => "Dana Darurat",
            MainCategory::Investment => "Investasi",
            MainCategory::Social => "Dana Sosial/Cadangan",
            MainCategory::Loan => "Pinjaman",
        }
    }

    /// Sub-categories that may be booked under this category.
    pub fn sub_categories(&self) -> &'static [SubCategory] {
        match self {
            MainCategory::Daily => &[
                SubCategory::Utilities,
                SubCategory::Internet,
                SubCategory::Electricity,
                SubCategory::Fuel,
                SubCategory::PhoneCredit,
                SubCategory::Food,
                SubCategory::Other,
            ],
            MainCategory::Investment => &[
                SubCategory::Stocks,
                SubCategory::MutualFunds,
                SubCategory::Crypto,
                SubCategory::Deposits,
            ],
            _ => &[SubCategory::None],
        }
    }

    pub fn allows(&self, sub_category: SubCategory) -> bool {
        self.sub_categories().contains(&sub_category)
    }
}

impl fmt::Display for MainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MainCategory {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MainCategory::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| TransactionError::InvalidInput(format!("unknown category '{}'", s)))
    }
}

/// Second-level bucket. Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubCategory {
    #[serde(rename = "Iuran & Air")]
    Utilities,
    #[serde(rename = "Internet")]
    Internet,
    #[serde(rename = "Listrik")]
    Electricity,
    #[serde(rename = "Bensin")]
    Fuel,
    #[serde(rename = "Pulsa")]
    PhoneCredit,
    #[serde(rename = "Makan")]
    Food,
    #[serde(rename = "Dan lain2")]
    Other,
    #[serde(rename = "Saham")]
    Stocks,
    #[serde(rename = "Reksadana")]
    MutualFunds,
    #[serde(rename = "Kripto")]
    Crypto,
    #[serde(rename = "Deposito")]
    Deposits,
    #[serde(rename = "None")]
    None,
}

impl SubCategory {
    pub const ALL: [SubCategory; 12] = [
        SubCategory::Utilities,
        SubCategory::Internet,
        SubCategory::Electricity,
        SubCategory::Fuel,
        SubCategory::PhoneCredit,
        SubCategory::Food,
        SubCategory::Other,
        SubCategory::Stocks,
        SubCategory::MutualFunds,
        SubCategory::Crypto,
        SubCategory::Deposits,
        SubCategory::None,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SubCategory::Utilities => "Iuran & Air",
            SubCategory::Internet => "Internet",
            SubCategory::Electricity => "Listrik",
            SubCategory::Fuel => "Bensin",
            SubCategory::PhoneCredit => "Pulsa",
            SubCategory::Food => "Makan",
            SubCategory::Other => "Dan lain2",
            SubCategory::Stocks => "Saham",
            SubCategory::MutualFunds => "Reksadana",
            SubCategory::Crypto => "Kripto",
            SubCategory::Deposits => "Deposito",
            SubCategory::None => "None",
        }
    }
}

impl fmt::Display for SubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SubCategory {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubCategory::ALL
            .into_iter()
            .find(|sub| sub.label() == s)
            .ok_or_else(|| {
                TransactionError::InvalidInput(format!("unknown sub-category '{}'", s))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub main_category: MainCategory,
    pub sub_category: SubCategory,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }
}

/// Input model for recording a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub main_category: MainCategory,
    #[serde(default = "default_sub_category")]
    pub sub_category: SubCategory,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

fn default_sub_category() -> SubCategory {
    SubCategory::None
}

/// Totals over a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net: Decimal,
    pub count: usize,
}

impl CategorySummary {
    pub fn from_transactions<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Result<Self, TransactionError> {
        let mut summary = CategorySummary::default();
        for transaction in transactions {
            let total = if transaction.is_income() {
                &mut summary.total_income
            } else {
                &mut summary.total_expense
            };
            *total = checked_total(*total, transaction.amount)?;
            summary.count += 1;
        }
        summary.net = summary
            .total_income
            .checked_sub(summary.total_expense)
            .ok_or(TransactionError::AmountOverflow)?;
        Ok(summary)
    }
}

/// `total + amount`, or `AmountOverflow`.
pub(crate) fn checked_total(total: Decimal, amount: Decimal) -> Result<Decimal, TransactionError> {
    total
        .checked_add(amount)
        .ok_or(TransactionError::AmountOverflow)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTransactions {
    pub category: MainCategory,
    pub transactions: Vec<Transaction>,
    pub summary: CategorySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: MainCategory,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    /// Expense totals per main category, largest first.
    pub expense_breakdown: Vec<CategoryTotal>,
    /// Income and expense per month, oldest first.
    pub monthly_history: Vec<MonthlyTotal>,
}
