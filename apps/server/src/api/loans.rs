use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uangkita_core::loans::{InstallmentStatus, Loan, LoanSummary, NewLoan, PaymentMeta};

/// Body of `PUT /loans/{id}/installments/{installment_id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstallmentStatusBody {
    status: InstallmentStatus,
    payment_date: Option<NaiveDate>,
    proof_reference: Option<String>,
}

impl InstallmentStatusBody {
    fn payment_meta(self) -> Option<PaymentMeta> {
        let proof_reference = self.proof_reference;
        self.payment_date.map(|payment_date| PaymentMeta {
            payment_date,
            proof_reference,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutstandingBalance {
    has_outstanding_balance: bool,
}

async fn list_loans(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Loan>>> {
    let loans = state.loan_service.list_loans()?;
    Ok(Json(loans))
}

async fn create_loan(
    State(state): State<Arc<AppState>>,
    Json(new_loan): Json<NewLoan>,
) -> ApiResult<(StatusCode, Json<Loan>)> {
    let loan = state.loan_service.create_loan(new_loan).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

async fn get_loan(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Loan>> {
    Ok(Json(state.loan_service.get_loan(&id)?))
}

async fn delete_loan(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.loan_service.delete_loan(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_loan_summary(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LoanSummary>> {
    Ok(Json(state.loan_service.get_loan_summary(&id)?))
}

async fn get_loan_outstanding(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<OutstandingBalance>> {
    let has_outstanding_balance = state.loan_service.has_outstanding_balance(&id)?;
    Ok(Json(OutstandingBalance {
        has_outstanding_balance,
    }))
}

async fn get_any_outstanding(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<OutstandingBalance>> {
    let has_outstanding_balance = state.loan_service.has_any_outstanding_balance()?;
    Ok(Json(OutstandingBalance {
        has_outstanding_balance,
    }))
}

async fn set_installment_status(
    Path((id, installment_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<InstallmentStatusBody>,
) -> ApiResult<Json<Loan>> {
    let status = body.status;
    let loan = state
        .loan_service
        .set_installment_status(&id, &installment_id, status, body.payment_meta())
        .await?;
    Ok(Json(loan))
}

async fn refresh_loans(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Loan>>> {
    state.loan_cache.invalidate();
    let loans = state.loan_service.refresh().await?;
    Ok(Json(loans))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/loans", get(list_loans).post(create_loan))
        .route("/loans/refresh", post(refresh_loans))
        .route("/loans/outstanding", get(get_any_outstanding))
        .route("/loans/{id}", get(get_loan).delete(delete_loan))
        .route("/loans/{id}/summary", get(get_loan_summary))
        .route("/loans/{id}/outstanding", get(get_loan_outstanding))
        .route(
            "/loans/{id}/installments/{installment_id}",
            put(set_installment_status),
        )
}
