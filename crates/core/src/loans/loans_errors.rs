use thiserror::Error;

use super::loans_model::InstallmentStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoanError {
    #[error("Invalid loan input: {0}")]
    InvalidInput(String),

    #[error("Loan not found: {0}")]
    LoanNotFound(String),

    #[error("Installment {installment_id} not found in loan {loan_id}")]
    InstallmentNotFound {
        loan_id: String,
        installment_id: String,
    },

    #[error("Cannot {action} installment {installment_id} while it is {status}")]
    InvalidTransition {
        installment_id: String,
        status: InstallmentStatus,
        action: &'static str,
    },

    #[error("Installment totals exceed the representable amount")]
    AmountOverflow,
}
