use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use txform_api::{create_router, AppState};
use txform_config::Config;
use txform_core::{
    CalculationBackend, CalculationRequest, CalculationResponse, CoreError, CoreResult,
};

/// In-process backend answering every request with the same body
struct StubBackend {
    reply: Result<String, String>,
    seen: Mutex<Vec<CalculationRequest>>,
}

impl StubBackend {
    fn answering(body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(body.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            reply: Err("Failed to reach calculation backend: connection refused".to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CalculationBackend for StubBackend {
    async fn process(&self, request: &CalculationRequest) -> CoreResult<CalculationResponse> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(body) => CalculationResponse::from_json(body),
            Err(message) => Err(CoreError::Transport { message: message.clone() }),
        }
    }
}

const SUMMARY: &str = r#"{"net_balance_before_interest":145,"final_balance_with_interest":160,"category_breakdown":{"goods":100,"services":50}}"#;

const TWO_ROWS: &str = "row=1&amount=100&vat=5&type=credit&category=goods\
&row=2&amount=50&vat=2&type=debit&category=services\
&years=2&interestRate=10&vatRate=5";

fn app(backend: Arc<StubBackend>) -> Router {
    create_router(AppState::new(Config::default(), backend))
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn alert_of(response: &Response<Body>) -> Option<String> {
    let raw = response.headers().get("HX-Trigger")?.to_str().ok()?;
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    value["showAlert"].as_str().map(|s| s.to_string())
}

/// Load the page and return the session id embedded in it
async fn open_session(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let html = body_string(response).await;

    let start = html.find("/sessions/").expect("page links to a session") + "/sessions/".len();
    html[start..start + 36].to_string()
}

async fn add_rows(app: &Router, session: &str, count: usize) -> Vec<String> {
    let mut fragments = Vec::new();
    for _ in 0..count {
        let response = app
            .clone()
            .oneshot(post(&format!("/sessions/{}/rows", session), ""))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        fragments.push(body_string(response).await);
    }
    fragments
}

#[tokio::test]
async fn health_check_works() {
    let response = app(StubBackend::answering(SUMMARY))
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn page_starts_with_hidden_result() {
    let app = app(StubBackend::answering(SUMMARY));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = body_string(response).await;

    assert!(html.contains("id='transactionFields'"));
    assert!(html.contains("id='result'"));
    assert!(html.contains("style='display:none'"));
    assert!(html.contains("showAlert"));
}

#[tokio::test]
async fn rows_are_numbered_from_one() {
    let app = app(StubBackend::answering(SUMMARY));
    let session = open_session(&app).await;

    let fragments = add_rows(&app, &session, 4).await;

    for (i, fragment) in fragments.iter().enumerate() {
        let n = i + 1;
        assert!(fragment.contains(&format!("name='row' value='{}'", n)));
        assert!(fragment.contains(&format!("id='amount{}'", n)));
    }
}

#[tokio::test]
async fn each_page_load_restarts_the_counter() {
    let app = app(StubBackend::answering(SUMMARY));
    let first = open_session(&app).await;
    add_rows(&app, &first, 2).await;

    let second = open_session(&app).await;
    assert_ne!(first, second);
    let fragments = add_rows(&app, &second, 1).await;
    assert!(fragments[0].contains("Transaction 1"));
}

#[tokio::test]
async fn submit_renders_summary() {
    let backend = StubBackend::answering(SUMMARY);
    let app = app(backend.clone());
    let session = open_session(&app).await;
    add_rows(&app, &session, 2).await;

    let response = app
        .clone()
        .oneshot(post(&format!("/sessions/{}/submit", session), TWO_ROWS))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(alert_of(&response).is_none());
    let html = body_string(response).await;
    assert!(html.contains("style='display:block'"));
    assert!(html.contains("<span id='net_balance' class='font-medium'>145</span>"));
    assert!(html.contains("<span id='final_balance' class='font-medium'>160</span>"));
    let goods = html.find("<li>goods: 100</li>").unwrap();
    let services = html.find("<li>services: 50</li>").unwrap();
    assert!(goods < services);

    let seen = backend.seen.lock().unwrap();
    assert_eq!(
        serde_json::to_string(&seen[0]).unwrap(),
        r#"{"transactions":[{"amount":100,"vat":5,"type":"credit","category":"goods"},{"amount":50,"vat":2,"type":"debit","category":"services"}],"years":2,"interestRate":0.1,"vatRate":0.05}"#
    );
}

#[tokio::test]
async fn backend_error_raises_alert() {
    let app = app(StubBackend::answering(r#"{"error":"bad input"}"#));
    let session = open_session(&app).await;
    add_rows(&app, &session, 2).await;

    let response = app
        .clone()
        .oneshot(post(&format!("/sessions/{}/submit", session), TWO_ROWS))
        .await
        .unwrap();

    assert_eq!(response.headers().get("HX-Reswap").unwrap(), "none");
    assert_eq!(alert_of(&response).as_deref(), Some("Error: bad input"));
    assert!(body_string(response).await.is_empty());
}

#[tokio::test]
async fn unreachable_backend_raises_alert() {
    let app = app(StubBackend::unreachable());
    let session = open_session(&app).await;
    add_rows(&app, &session, 2).await;

    let response = app
        .clone()
        .oneshot(post(&format!("/sessions/{}/submit", session), TWO_ROWS))
        .await
        .unwrap();

    assert_eq!(response.headers().get("HX-Reswap").unwrap(), "none");
    let alert = alert_of(&response).unwrap();
    assert!(alert.starts_with("Error: Failed to reach calculation backend"));
}

#[tokio::test]
async fn empty_form_submits_no_transactions() {
    let backend = StubBackend::answering(
        r#"{"net_balance_before_interest":0,"final_balance_with_interest":0,"category_breakdown":{}}"#,
    );
    let app = app(backend.clone());
    let session = open_session(&app).await;

    let response = app
        .clone()
        .oneshot(post(
            &format!("/sessions/{}/submit", session),
            "years=1&interestRate=0&vatRate=0",
        ))
        .await
        .unwrap();

    assert!(alert_of(&response).is_none());
    assert!(backend.seen.lock().unwrap()[0].transactions.is_empty());
}

#[tokio::test]
async fn unknown_session_raises_alert() {
    let app = app(StubBackend::answering(SUMMARY));

    for uri in [
        "/sessions/not-a-session/rows",
        "/sessions/00000000-0000-0000-0000-000000000000/rows",
    ] {
        let response = app.clone().oneshot(post(uri, "")).await.unwrap();
        let alert = alert_of(&response).unwrap();
        assert!(alert.starts_with("Error: Form session"), "{}", alert);
        assert!(alert.contains("reload the page"));
    }
}

#[tokio::test]
async fn invalid_number_is_rejected_before_sending() {
    let backend = StubBackend::answering(SUMMARY);
    let app = app(backend.clone());
    let session = open_session(&app).await;
    add_rows(&app, &session, 1).await;

    let response = app
        .clone()
        .oneshot(post(
            &format!("/sessions/{}/submit", session),
            "row=1&amount=abc&vat=5&type=credit&category=goods&years=2&interestRate=10&vatRate=5",
        ))
        .await
        .unwrap();

    assert_eq!(
        alert_of(&response).as_deref(),
        Some("Error: Invalid value for amount1: not a number")
    );
    assert!(backend.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn preview_returns_request_json() {
    let backend = StubBackend::answering(SUMMARY);
    let app = app(backend.clone());
    let session = open_session(&app).await;
    add_rows(&app, &session, 2).await;

    let response = app
        .clone()
        .oneshot(post(&format!("/api/sessions/{}/preview", session), TWO_ROWS))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["years"], 2);
    assert_eq!(json["interestRate"], 0.1);
    assert_eq!(json["transactions"][1]["category"], "services");
    assert!(backend.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn preview_reports_missing_rows() {
    let app = app(StubBackend::answering(SUMMARY));
    let session = open_session(&app).await;
    add_rows(&app, &session, 1).await;

    let response = app
        .clone()
        .oneshot(post(
            &format!("/api/sessions/{}/preview", session),
            "years=1&interestRate=0&vatRate=0",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["error"], "Transaction 1 is missing from the submission");
    assert_eq!(json["code"], "MISSING_ROW");
    assert_eq!(json["details"]["row"], 1);
    assert!(json["suggestions"][0].as_str().unwrap().contains("Reload the page"));
}

#[tokio::test]
async fn preview_rejects_repeated_row() {
    let app = app(StubBackend::answering(SUMMARY));
    let session = open_session(&app).await;
    add_rows(&app, &session, 1).await;

    let response = app
        .clone()
        .oneshot(post(
            &format!("/api/sessions/{}/preview", session),
            "row=1&amount=1&vat=0&type=credit&category=goods\
&row=1&amount=999&vat=0&type=debit&category=goods\
&years=1&interestRate=0&vatRate=0",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["code"], "INVALID_INPUT");
    assert_eq!(json["details"]["field"], "row");
}
