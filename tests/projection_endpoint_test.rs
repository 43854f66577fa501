use axum::http::StatusCode;
use nestegg::api::{self, AppState};
use nestegg::config::{Config, SellPolicy};
use nestegg::db::init_db;
use nestegg::Repository;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    _temp: TempDir,
}

async fn setup_test_app(max_projection_years: u32) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");

    let repo = Arc::new(Repository::new(pool));
    let config = Config {
        port: 0,
        database_path: ":memory:".to_string(),
        sell_policy: SellPolicy::Allow,
        max_projection_years,
    };
    let app = api::create_router(AppState { repo, config });

    TestApp {
        app,
        _temp: temp_dir,
    }
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, axum::body::Bytes) {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

#[tokio::test]
async fn test_projection_series_shape_and_invested() {
    let test_app = setup_test_app(100).await;

    let (status, bytes) = get(
        test_app.app.clone(),
        "/v1/projection?initialAmount=1000&monthlyAmount=500&years=20&annualReturnPct=7",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let points = body["points"].as_array().unwrap();
    assert_eq!(points.len(), 20 * 12 + 1);

    let first = &points[0];
    assert_eq!(first["month"], 0);
    assert_eq!(first["total"], 1000.0);
    assert_eq!(first["gains"], 0.0);

    // Contributions are exact regardless of compounding.
    let last = &points[points.len() - 1];
    assert_eq!(last["month"], 240);
    assert_eq!(last["invested"], 1000.0 + 500.0 * 240.0);
    assert!(last["gains"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_projection_is_deterministic() {
    let test_app = setup_test_app(100).await;
    let uri = "/v1/projection?initialAmount=2500&monthlyAmount=300&years=15&annualReturnPct=5.5";

    let (_, first) = get(test_app.app.clone(), uri).await;
    let (_, second) = get(test_app.app.clone(), uri).await;

    // Byte-identical responses for identical inputs.
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_yearly_sampling() {
    let test_app = setup_test_app(100).await;

    let (status, bytes) = get(
        test_app.app.clone(),
        "/v1/projection?initialAmount=1000&years=3&sampling=yearly",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let months: Vec<i64> = body["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["month"].as_i64().unwrap())
        .collect();
    assert_eq!(months, vec![0, 12, 24, 36]);
}

#[tokio::test]
async fn test_zero_rate_accumulates_contributions_only() {
    let test_app = setup_test_app(100).await;

    let (_, bytes) = get(
        test_app.app.clone(),
        "/v1/projection?monthlyAmount=100&years=1",
    )
    .await;

    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let last = &body["points"].as_array().unwrap()[12];
    assert_eq!(last["total"], 1200.0);
    assert_eq!(last["gains"], 0.0);
}

#[tokio::test]
async fn test_years_zero_rejected() {
    let test_app = setup_test_app(100).await;

    let (status, _) = get(test_app.app.clone(), "/v1/projection?years=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_years_above_cap_rejected() {
    let test_app = setup_test_app(50).await;

    let (status, _) = get(test_app.app.clone(), "/v1/projection?years=51").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(test_app.app.clone(), "/v1/projection?years=50").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_negative_amount_rejected() {
    let test_app = setup_test_app(100).await;

    let (status, _) = get(
        test_app.app.clone(),
        "/v1/projection?initialAmount=-5&years=1",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_sampling_rejected() {
    let test_app = setup_test_app(100).await;

    let (status, _) = get(
        test_app.app.clone(),
        "/v1/projection?years=1&sampling=weekly",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
