use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;
use uangkita_server::{api::app_router, build_state, config::Config};

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("test.db");
    let config = Config::with_db_path(db_path.to_string_lossy().to_string());
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn new_loan() -> Value {
    json!({
        "principal": 12000000,
        "annualRatePercent": 12,
        "tenorMonths": 12,
        "originationDate": "2024-01-20"
    })
}

#[tokio::test]
async fn healthz_responds() {
    let (app, _tmp) = build_test_router().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn loan_lifecycle() {
    let (app, _tmp) = build_test_router().await;

    let (status, loan) = send(&app, Method::POST, "/api/v1/loans", Some(new_loan())).await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = loan["id"].as_str().unwrap().to_string();
    let installments = loan["installments"].as_array().unwrap();
    assert_eq!(installments.len(), 12);
    assert_eq!(installments[0]["id"], "installment-1");
    assert_eq!(installments[0]["dueDate"], "2024-02-05");
    assert_eq!(installments[0]["totalAmount"].as_f64(), Some(1_120_000.0));
    assert_eq!(installments[11]["remainingPrincipal"].as_f64(), Some(0.0));

    let (status, loans) = send(&app, Method::GET, "/api/v1/loans", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loans.as_array().unwrap().len(), 1);

    let installment_uri = format!("/api/v1/loans/{}/installments/installment-1", loan_id);
    let paid = json!({ "status": "paid", "paymentDate": "2024-02-04", "proofReference": "TRX-001" });
    let (status, updated) = send(&app, Method::PUT, &installment_uri, Some(paid.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["installments"][0]["status"], "paid");
    assert_eq!(updated["installments"][0]["proofReference"], "TRX-001");

    let (status, error) = send(&app, Method::PUT, &installment_uri, Some(paid)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], 409);

    let (status, summary) =
        send(&app, Method::GET, &format!("/api/v1/loans/{}/summary", loan_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["paidCount"], 1);
    assert_eq!(summary["installmentCount"], 12);

    let (status, outstanding) = send(
        &app,
        Method::GET,
        &format!("/api/v1/loans/{}/outstanding", loan_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outstanding["hasOutstandingBalance"], true);

    let (status, cancelled) =
        send(&app, Method::PUT, &installment_uri, Some(json!({ "status": "unpaid" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["installments"][0]["status"], "unpaid");
    assert!(cancelled["installments"][0]["paymentDate"].is_null());

    let (status, refreshed) = send(&app, Method::POST, "/api/v1/loans/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed.as_array().unwrap().len(), 1);
    assert_eq!(refreshed[0]["installments"][0]["status"], "unpaid");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/loans/{}", loan_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, error) =
        send(&app, Method::GET, &format!("/api/v1/loans/{}/summary", loan_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], 404);

    let (status, any) = send(&app, Method::GET, "/api/v1/loans/outstanding", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(any["hasOutstandingBalance"], false);
}

#[tokio::test]
async fn loan_input_errors_are_bad_requests() {
    let (app, _tmp) = build_test_router().await;

    let mut invalid = new_loan();
    invalid["tenorMonths"] = json!(0);
    let (status, _) = send(&app, Method::POST, "/api/v1/loans", Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, loan) = send(&app, Method::POST, "/api/v1/loans", Some(new_loan())).await;
    let uri = format!(
        "/api/v1/loans/{}/installments/installment-2",
        loan["id"].as_str().unwrap()
    );
    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "status": "paid" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/loans/missing/installments/installment-1",
        Some(json!({ "status": "unpaid" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transactions_and_dashboard() {
    let (app, _tmp) = build_test_router().await;

    let (status, salary) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({
            "type": "income",
            "mainCategory": "Investasi",
            "amount": 8000000,
            "date": "2024-03-01",
            "description": "Gaji"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(salary["mainCategory"], "Pemasukan");

    let (status, lunch) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({
            "type": "expense",
            "mainCategory": "Kebutuhan Harian",
            "subCategory": "Makan",
            "amount": 50000,
            "date": "2024-03-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({
            "type": "expense",
            "mainCategory": "Kebutuhan Harian",
            "subCategory": "Saham",
            "amount": 1,
            "date": "2024-03-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listed) = send(&app, Method::GET, "/api/v1/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["id"], lunch["id"]);

    let (status, daily) = send(
        &app,
        Method::GET,
        "/api/v1/transactions/category/Kebutuhan%20Harian",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(daily["summary"]["count"], 1);
    assert_eq!(daily["summary"]["totalExpense"].as_f64(), Some(50_000.0));

    let (status, _) = send(&app, Method::GET, "/api/v1/transactions/category/Hiburan", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, dashboard) = send(&app, Method::GET, "/api/v1/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["balance"].as_f64(), Some(7_950_000.0));
    assert_eq!(dashboard["monthlyHistory"][0]["month"], "2024-03");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/transactions/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("id,date,type,main_category,sub_category,amount,description"));
    assert_eq!(csv.lines().count(), 3);

    let delete_uri = format!("/api/v1/transactions/{}", lunch["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::DELETE, &delete_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &delete_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
