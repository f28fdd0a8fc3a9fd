mod common;

use axum::http::StatusCode;
use common::{build_test_app, delete, get, post};
use serde_json::json;

#[tokio::test]
async fn test_subscribe_is_idempotent() {
    let (app, _db) = build_test_app().await;

    let (status, body) = post(
        &app,
        "/api/newsletter/subscribe",
        json!({ "email": "  News@Example.com " }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "news@example.com");

    let (status, body) = post(
        &app,
        "/api/newsletter/subscribe",
        json!({ "email": "news@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["already_subscribed"], true);

    let (_, body) = get(&app, "/api/admin/newsletter").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unsubscribe_and_resubscribe() {
    let (app, _db) = build_test_app().await;
    post(&app, "/api/newsletter/subscribe", json!({ "email": "a@example.com" })).await;

    let (status, body) = post(&app, "/api/newsletter/unsubscribe", json!({ "email": "A@example.com" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    let (_, body) = get(&app, "/api/admin/newsletter?active=true").await;
    assert_eq!(body["data"], json!([]));

    let (status, body) = post(&app, "/api/newsletter/subscribe", json!({ "email": "a@example.com" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["already_subscribed"], false);
}

#[tokio::test]
async fn test_unknown_email_and_invalid_email() {
    let (app, _db) = build_test_app().await;

    let (status, _) = post(&app, "/api/newsletter/unsubscribe", json!({ "email": "ghost@example.com" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/api/newsletter/subscribe", json!({ "email": "nope" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_removes_subscriber() {
    let (app, _db) = build_test_app().await;
    post(&app, "/api/newsletter/subscribe", json!({ "email": "b@example.com" })).await;
    let (_, body) = get(&app, "/api/admin/newsletter").await;
    let id = body["data"][0]["id"].as_i64().unwrap();

    let (status, _) = delete(&app, &format!("/api/admin/newsletter/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/api/admin/newsletter").await;
    assert_eq!(body["data"], json!([]));
}
