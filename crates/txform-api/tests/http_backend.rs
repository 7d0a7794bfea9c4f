//! Outbound requests from the HTTP backend client against a local stub server

use axum::{http::HeaderMap, routing::post, Router};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use txform_core::{
    CalculationBackend, CalculationRequest, CalculationResponse, Category, CoreError,
    HttpCalculationBackend, TransactionEntry, TransactionType,
};

#[derive(Default)]
struct Captured {
    content_type: Option<String>,
    body: Option<String>,
}

/// Serve `reply` on /process-transactions and record what was posted
async fn spawn_stub(status: u16, reply: &'static str) -> (String, Arc<Mutex<Captured>>) {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let sink = captured.clone();

    let router = Router::new().route(
        "/process-transactions",
        post(move |headers: HeaderMap, body: String| {
            let sink = sink.clone();
            async move {
                let mut captured = sink.lock().unwrap();
                captured.content_type = headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v.to_string());
                captured.body = Some(body);
                (
                    axum::http::StatusCode::from_u16(status).unwrap(),
                    [("content-type", "application/json")],
                    reply,
                )
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}/process-transactions", addr), captured)
}

fn sample_request() -> CalculationRequest {
    CalculationRequest {
        transactions: vec![
            TransactionEntry {
                amount: 100.0,
                vat: 5.0,
                kind: TransactionType::Credit,
                category: Category::Goods,
            },
            TransactionEntry {
                amount: 50.0,
                vat: 2.0,
                kind: TransactionType::Debit,
                category: Category::Services,
            },
        ],
        years: 2,
        interest_rate: 0.1,
        vat_rate: 0.05,
    }
}

#[tokio::test]
async fn posts_json_and_parses_summary() {
    let (url, captured) = spawn_stub(
        200,
        r#"{"net_balance_before_interest":145,"final_balance_with_interest":160,"category_breakdown":{"goods":100,"services":50}}"#,
    )
    .await;
    let backend = HttpCalculationBackend::new(&url).unwrap();

    let response = backend.process(&sample_request()).await.unwrap();

    let CalculationResponse::Success(result) = response else {
        panic!("expected a summary");
    };
    assert_eq!(result.final_balance_with_interest, 160.0);

    let captured = captured.lock().unwrap();
    assert_eq!(captured.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        captured.body.as_deref(),
        Some(r#"{"transactions":[{"amount":100,"vat":5,"type":"credit","category":"goods"},{"amount":50,"vat":2,"type":"debit","category":"services"}],"years":2,"interestRate":0.1,"vatRate":0.05}"#)
    );
}

#[tokio::test]
async fn error_body_is_read_regardless_of_status() {
    let (url, _) = spawn_stub(400, r#"{"error":"Invalid input"}"#).await;
    let backend = HttpCalculationBackend::new(&url).unwrap();

    let response = backend.process(&sample_request()).await.unwrap();
    assert_eq!(response, CalculationResponse::Error("Invalid input".to_string()));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let (url, _) = spawn_stub(500, "Internal Server Error").await;
    let backend = HttpCalculationBackend::new(&url).unwrap();

    let result = backend.process(&sample_request()).await;
    assert!(matches!(result, Err(CoreError::MalformedResponse { .. })));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Bind then drop to get a port nothing is listening on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend =
        HttpCalculationBackend::new(&format!("http://{}/process-transactions", addr)).unwrap();
    let result = backend.process(&sample_request()).await;

    assert!(matches!(result, Err(CoreError::Transport { .. })));
}
