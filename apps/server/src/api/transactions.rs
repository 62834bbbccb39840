use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use uangkita_core::transactions::{
    CategoryTransactions, DashboardSummary, MainCategory, NewTransaction, Transaction,
};

async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(state.transaction_service.list_transactions()?))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(new_transaction): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let transaction = state
        .transaction_service
        .create_transaction(new_transaction)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.transaction_service.delete_transaction(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `category` is the display label, e.g. `Kebutuhan Harian`.
async fn get_transactions_by_category(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CategoryTransactions>> {
    let category: MainCategory = category.parse()?;
    Ok(Json(
        state
            .transaction_service
            .get_transactions_by_category(category)?,
    ))
}

async fn export_transactions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let csv = state.transaction_service.export_csv()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv,
    ))
}

async fn get_dashboard(State(state): State<Arc<AppState>>) -> ApiResult<Json<DashboardSummary>> {
    Ok(Json(state.transaction_service.get_dashboard_summary()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/export", get(export_transactions))
        .route(
            "/transactions/category/{category}",
            get(get_transactions_by_category),
        )
        .route("/transactions/{id}", delete(delete_transaction))
        .route("/dashboard", get(get_dashboard))
}
