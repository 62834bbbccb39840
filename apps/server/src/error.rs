use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uangkita_core::errors::Error as CoreError;
use uangkita_core::loans::LoanError;
use uangkita_core::transactions::TransactionError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => core_status(e),
            ApiError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn core_status(error: &CoreError) -> StatusCode {
    if error.is_not_found() {
        return StatusCode::NOT_FOUND;
    }
    match error {
        CoreError::Loan(LoanError::InvalidTransition { .. }) => StatusCode::CONFLICT,
        CoreError::Loan(LoanError::AmountOverflow)
        | CoreError::Transaction(TransactionError::AmountOverflow) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        CoreError::Loan(_) | CoreError::Transaction(TransactionError::InvalidInput(_)) => {
            StatusCode::BAD_REQUEST
        }
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Persist(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        ApiError::Core(err.into())
    }
}
