mod common;

use axum::http::StatusCode;
use common::{build_test_app, delete, get, patch, post};
use serde_json::json;

#[tokio::test]
async fn test_task_crud() {
    let (app, _db) = build_test_app().await;

    let (status, body) = post(
        &app,
        "/api/admin/tasks",
        json!({ "title": "Update spring catalog", "due_date": "2026-03-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["due_date"], "2026-03-01");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = patch(
        &app,
        &format!("/api/admin/tasks/{id}"),
        json!({ "status": "in_progress" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "in_progress");

    let (_, body) = get(&app, "/api/admin/tasks?status=in_progress").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = get(&app, "/api/admin/tasks?status=done").await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = delete(&app, &format!("/api/admin/tasks/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = patch(&app, &format!("/api/admin/tasks/{id}"), json!({ "title": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
