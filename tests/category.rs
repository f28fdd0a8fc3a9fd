mod common;

use axum::http::StatusCode;
use common::{build_test_app, create_category, delete, get, patch, post, simple_product};
use serde_json::json;

#[tokio::test]
async fn test_categories_empty() {
    let (app, _db) = build_test_app().await;

    let (status, body) = get(&app, "/api/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_create_category() {
    let (app, _db) = build_test_app().await;

    let (status, body) = post(
        &app,
        "/api/admin/categories",
        json!({
            "name": "Sillas",
            "description": "Chairs for every room",
            "sort_order": 2
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Sillas");
    assert_eq!(body["data"]["is_active"], true);
    assert_eq!(body["data"]["sort_order"], 2);
}

#[tokio::test]
async fn test_duplicate_category_conflicts() {
    let (app, _db) = build_test_app().await;
    create_category(&app, "Sofas").await;

    let (status, body) = post(&app, "/api/admin/categories", json!({ "name": "Sofas" })).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Category already exists");
}

#[tokio::test]
async fn test_empty_name_is_rejected() {
    let (app, _db) = build_test_app().await;

    let (status, body) = post(&app, "/api/admin/categories", json!({ "name": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_public_list_hides_inactive_and_counts_products() {
    let (app, _db) = build_test_app().await;
    create_category(&app, "Lamps").await;
    let hidden = create_category(&app, "Archive").await;
    simple_product(&app, "desklamp", "Lamps").await;
    simple_product(&app, "walllamp", "Lamps").await;

    let (status, _) = patch(
        &app,
        &format!("/api/admin/categories/{hidden}"),
        json!({ "is_active": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    let categories = body["data"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Lamps");
    assert_eq!(categories[0]["product_count"], 2);

    let (status, _) = get(&app, &format!("/api/categories/{hidden}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/api/admin/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rename_category_moves_products() {
    let (app, _db) = build_test_app().await;
    let id = create_category(&app, "Mesas").await;
    let product_id = simple_product(&app, "diningtable", "Mesas").await;

    let (status, body) = patch(
        &app,
        &format!("/api/admin/categories/{id}"),
        json!({ "name": "Tables" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Tables");

    let (_, body) = get(&app, &format!("/api/products/{product_id}")).await;
    assert_eq!(body["data"]["category"], "Tables");
}

#[tokio::test]
async fn test_delete_category() {
    let (app, _db) = build_test_app().await;
    let id = create_category(&app, "Rugs").await;

    let (status, body) = delete(&app, &format!("/api/admin/categories/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Resource deleted successfully.");

    let (status, _) = delete(&app, &format!("/api/admin/categories/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let (app, _db) = build_test_app().await;

    let (status, body) = post(&app, "/api/admin/categories", json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = get(&app, "/api/categories").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_blank_rename_keeps_products() {
    let (app, _db) = build_test_app().await;
    let id = create_category(&app, "Sofas").await;
    let product_id = simple_product(&app, "chesterfield", "Sofas").await;

    let (status, _) = patch(
        &app,
        &format!("/api/admin/categories/{id}"),
        json!({ "name": "  " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, &format!("/api/products/{product_id}")).await;
    assert_eq!(body["data"]["category"], "Sofas");
}
