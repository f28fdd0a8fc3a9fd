mod common;

use axum::http::StatusCode;
use common::{build_test_app, create_category, delete, get, patch, post, simple_product};
use serde_json::json;

const SESSION: &str = "inquiry-session-1";

#[tokio::test]
async fn test_inquiry_snapshots_and_clears_cart() {
    let (app, _db) = build_test_app().await;
    create_category(&app, "Chairs").await;
    let product_id = simple_product(&app, "armchair", "Chairs").await;
    post(
        &app,
        &format!("/api/cart/{SESSION}/items"),
        json!({ "product_id": product_id, "quantity": 3 }),
    )
    .await;

    let (status, body) = post(
        &app,
        "/api/inquiries",
        json!({
            "name": "Ana Pérez",
            "email": "ana@example.com",
            "phone": "+34 600 000 000",
            "message": "Please send a quote",
            "session_id": SESSION
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["product_id"], product_id);
    assert_eq!(products[0]["quantity"], 3);
    assert_eq!(products[0]["name"], "armchair");

    let (_, body) = get(&app, &format!("/api/cart/{SESSION}")).await;
    assert_eq!(body["data"]["items"], json!([]));
}

#[tokio::test]
async fn test_inquiry_with_explicit_products() {
    let (app, _db) = build_test_app().await;

    let (status, body) = post(
        &app,
        "/api/inquiries",
        json!({
            "name": "Luis",
            "email": "luis@example.com",
            "message": "Interested",
            "products": [{ "product_id": 7, "name": "Sofa", "quantity": 1 }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["products"][0]["name"], "Sofa");
    assert_eq!(body["data"]["products"][0]["image"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_inquiry_validation() {
    let (app, _db) = build_test_app().await;

    let (status, body) = post(
        &app,
        "/api/inquiries",
        json!({ "name": "X", "email": "not-an-email", "message": "Hi" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = post(
        &app,
        "/api/inquiries",
        json!({
            "name": "X",
            "email": "x@example.com",
            "message": "Hi",
            "products": [{ "product_id": 1, "name": "Sofa", "quantity": 0 }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_inquiry_status_flow() {
    let (app, _db) = build_test_app().await;
    let (_, body) = post(
        &app,
        "/api/inquiries",
        json!({ "name": "Marta", "email": "marta@example.com", "message": "Call me" }),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = patch(
        &app,
        &format!("/api/admin/inquiries/{id}/status"),
        json!({ "status": "contacted" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "contacted");

    let (_, body) = get(&app, "/api/admin/inquiries?status=pending").await;
    assert_eq!(body["data"], json!([]));
    let (_, body) = get(&app, "/api/admin/inquiries?status=contacted").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = delete(&app, &format!("/api/admin/inquiries/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &format!("/api/admin/inquiries/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
