mod common;

use axum::http::StatusCode;
use common::{build_test_app, get};

#[tokio::test]
async fn test_health() {
    let (app, _db) = build_test_app().await;

    let (status, body) = get(&app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_uploads_are_served() {
    let (app, _db) = build_test_app().await;

    let (status, body) = get(&app, "/uploads/hello.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::Value::String("lb premium\n".to_string()));

    let (status, _) = get(&app, "/uploads/missing.jpg").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _db) = build_test_app().await;

    let (status, _) = get(&app, "/api/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
