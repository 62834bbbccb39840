use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Invalid transaction input: {0}")]
    InvalidInput(String),

    #[error("Transaction not found: {0}")]
    NotFound(String),

    #[error("Transaction totals exceed the representable amount")]
    AmountOverflow,
}
