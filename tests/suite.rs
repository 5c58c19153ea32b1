//! End-to-end suite runs against a stub backend.
//!
//! The stub implements the three endpoints the suite consumes: root greeting,
//! status-check create and list. `axum`'s Json extractor rejects malformed
//! bodies with 400/422, matching the behavior the error-handling case
//! asserts.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use smoke_tester::client::{ApiClient, StatusCheck};
use smoke_tester::runner::run_suite;
use smoke_tester::utils::config::SuiteConfig;

type Records = Arc<Mutex<Vec<StubRecord>>>;

#[derive(Clone, serde::Serialize)]
struct StubRecord {
    id: String,
    client_name: String,
    timestamp: String,
}

#[derive(serde::Deserialize)]
struct CreateBody {
    client_name: String,
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello World" }))
}

async fn list_status(State(records): State<Records>) -> Json<Vec<StubRecord>> {
    Json(records.lock().unwrap().clone())
}

async fn create_status(
    State(records): State<Records>,
    Json(body): Json<CreateBody>,
) -> Json<StubRecord> {
    let record = StubRecord {
        id: uuid::Uuid::new_v4().to_string(),
        client_name: body.client_name,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    records.lock().unwrap().push(record.clone());
    Json(record)
}

/// Bind the stub backend on a random port and return its base URL.
async fn spawn_app() -> String {
    let records: Records = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/api/", get(root))
        .route("/api/status", get(list_status).post(create_status))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(records);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub backend");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

fn test_config(base_url: &str) -> SuiteConfig {
    let mut config = SuiteConfig::default().with_base_url(base_url);
    config.request_timeout_ms = 5_000;
    config.settle_delay_ms = 50;
    config
}

#[tokio::test]
async fn suite_passes_against_healthy_backend() {
    let base_url = spawn_app().await;

    let report = run_suite(test_config(&base_url)).await.unwrap();

    assert_eq!(
        report.summary.failed,
        0,
        "failures: {:?}",
        report.failures()
    );
    assert_eq!(report.summary.passed, report.summary.total);
    // connectivity, cors, format x2, create, list, persistence, error x2
    assert_eq!(report.summary.total, 9);
    assert_eq!(report.results[0].name, "Basic API Connectivity");
    assert!((report.summary.success_rate - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn suite_fails_against_stopped_server() {
    // Bind then drop, so the port is very likely unreachable
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base_url = format!("http://{}/api", addr);
    let mut config = test_config(&base_url);
    config.request_timeout_ms = 2_000;

    let report = run_suite(config).await.unwrap();

    assert!(report.summary.total > 0);
    assert_eq!(report.summary.passed, 0);
    assert_eq!(report.summary.failed, report.summary.total);

    let connectivity = &report.results[0];
    assert_eq!(connectivity.name, "Basic API Connectivity");
    assert!(!connectivity.passed);
    assert!(connectivity.message.starts_with("Connection error"));
}

#[tokio::test]
async fn reads_have_no_side_effects() {
    let base_url = spawn_app().await;
    let client = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();

    client.create_status("idempotence probe").await.unwrap();

    let first: Vec<StatusCheck> = client.list_status().await.unwrap().json().unwrap();
    let second: Vec<StatusCheck> = client.list_status().await.unwrap().json().unwrap();
    assert_eq!(first.len(), second.len());
}

#[tokio::test]
async fn created_record_round_trips() {
    let base_url = spawn_app().await;
    let client = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();

    let resp = client.create_status("SmartTour Test Client").await.unwrap();
    assert_eq!(resp.status, 200);

    let created: StatusCheck = resp.json().unwrap();
    assert!(created.missing_fields().is_empty());
    assert_eq!(created.client_name.as_deref(), Some("SmartTour Test Client"));
    assert!(created.timestamp_parses());
    assert!(!created.id.as_deref().unwrap_or_default().is_empty());

    let listed: Vec<StatusCheck> = client.list_status().await.unwrap().json().unwrap();
    assert!(listed
        .iter()
        .any(|c| c.client_name.as_deref() == Some("SmartTour Test Client")));
}

#[tokio::test]
async fn rejects_missing_and_malformed_bodies() {
    let base_url = spawn_app().await;
    let client = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();

    let missing_field = client.post_status_raw("{}", "application/json").await.unwrap();
    assert!(
        matches!(missing_field.status, 400 | 422),
        "got HTTP {}",
        missing_field.status
    );

    let malformed = client
        .post_status_raw("not valid json", "application/json")
        .await
        .unwrap();
    assert!(
        matches!(malformed.status, 400 | 422),
        "got HTTP {}",
        malformed.status
    );
}

#[tokio::test]
async fn cors_header_is_surfaced() {
    let base_url = spawn_app().await;
    let client = ApiClient::new(&base_url, Duration::from_secs(5)).unwrap();

    let resp = client
        .get_root_with_origin("http://localhost:3000")
        .await
        .unwrap();
    assert_eq!(resp.status, 200);
    assert!(resp.allow_origin.is_some());
}
