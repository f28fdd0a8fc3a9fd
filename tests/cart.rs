mod common;

use axum::http::StatusCode;
use common::{build_test_app, create_category, delete, get, patch, post, simple_product};
use chrono::Utc;
use lb_premium::entities::{cart, cart_item};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::json;

const SESSION: &str = "session-0001";

#[tokio::test]
async fn test_get_cart_creates_empty_cart() {
    let (app, _db) = build_test_app().await;

    let (status, body) = get(&app, &format!("/api/cart/{SESSION}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["session_id"], SESSION);
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(body["data"]["total_items"], 0);
}

#[tokio::test]
async fn test_create_session_returns_uuid() {
    let (app, _db) = build_test_app().await;

    let (status, body) = post(&app, "/api/cart", json!({})).await;

    assert_eq!(status, StatusCode::CREATED);
    let session_id = body["data"]["session_id"].as_str().unwrap();
    assert_eq!(session_id.len(), 36);

    let (status, _) = get(&app, &format!("/api/cart/{session_id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_add_same_product_increments_quantity() {
    let (app, _db) = build_test_app().await;
    create_category(&app, "Chairs").await;
    let product_id = simple_product(&app, "armchair", "Chairs").await;

    let uri = format!("/api/cart/{SESSION}/items");
    let (status, body) = post(&app, &uri, json!({ "product_id": product_id, "quantity": 2 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["items"][0]["name"], "armchair");
    assert_eq!(body["data"]["items"][0]["image"], "/uploads/armchair.jpg");

    let (status, body) = post(&app, &uri, json!({ "product_id": product_id })).await;
    assert_eq!(status, StatusCode::OK);

    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(body["data"]["total_items"], 3);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let (app, _db) = build_test_app().await;

    let (status, body) = post(
        &app,
        &format!("/api/cart/{SESSION}/items"),
        json!({ "product_id": 42, "quantity": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No product with 42 id was found");
}

#[tokio::test]
async fn test_add_inactive_product_is_not_found() {
    let (app, _db) = build_test_app().await;
    create_category(&app, "Chairs").await;
    let product_id = simple_product(&app, "stool", "Chairs").await;
    let (status, _) = patch(
        &app,
        &format!("/api/admin/products/{product_id}"),
        json!({ "is_active": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(
        &app,
        &format!("/api/cart/{SESSION}/items"),
        json!({ "product_id": product_id }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zero_quantity_is_rejected_on_add() {
    let (app, _db) = build_test_app().await;
    create_category(&app, "Chairs").await;
    let product_id = simple_product(&app, "bench", "Chairs").await;

    let (status, body) = post(
        &app,
        &format!("/api/cart/{SESSION}/items"),
        json!({ "product_id": product_id, "quantity": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_patch_and_remove_entries() {
    let (app, _db) = build_test_app().await;
    create_category(&app, "Tables").await;
    let first = simple_product(&app, "desk", "Tables").await;
    let second = simple_product(&app, "counter", "Tables").await;

    let uri = format!("/api/cart/{SESSION}/items");
    post(&app, &uri, json!({ "product_id": first })).await;
    let (_, body) = post(&app, &uri, json!({ "product_id": second })).await;
    let first_line = body["data"]["items"][0]["id"].as_i64().unwrap();
    let second_line = body["data"]["items"][1]["id"].as_i64().unwrap();

    let (status, body) = patch(&app, &format!("{uri}/{first_line}"), json!({ "quantity": 5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["quantity"], 5);

    let (status, body) = delete(&app, &format!("{uri}/{second_line}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    // quantity 0 drops the line
    let (status, body) = patch(&app, &format!("{uri}/{first_line}"), json!({ "quantity": 0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));

    let (status, _) = delete(&app, &format!("{uri}/{first_line}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_entries_are_scoped_to_their_session() {
    let (app, _db) = build_test_app().await;
    create_category(&app, "Tables").await;
    let product_id = simple_product(&app, "desk", "Tables").await;

    let (_, body) = post(
        &app,
        &format!("/api/cart/{SESSION}/items"),
        json!({ "product_id": product_id }),
    )
    .await;
    let line = body["data"]["items"][0]["id"].as_i64().unwrap();

    get(&app, "/api/cart/other-session").await;
    let (status, _) = delete(&app, &format!("/api/cart/other-session/items/{line}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clear_cart_keeps_cart() {
    let (app, _db) = build_test_app().await;
    create_category(&app, "Lamps").await;
    let product_id = simple_product(&app, "floorlamp", "Lamps").await;
    post(
        &app,
        &format!("/api/cart/{SESSION}/items"),
        json!({ "product_id": product_id, "quantity": 4 }),
    )
    .await;

    let (status, body) = delete(&app, &format!("/api/cart/{SESSION}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));

    let (status, body) = get(&app, &format!("/api/cart/{SESSION}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["session_id"], SESSION);
    assert_eq!(body["data"]["total_items"], 0);
}

#[tokio::test]
async fn test_invalid_session_id_is_rejected() {
    let (app, _db) = build_test_app().await;

    let (status, body) = get(&app, "/api/cart/short").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_quantity_above_limit_is_rejected() {
    let (app, _db) = build_test_app().await;
    create_category(&app, "Chairs").await;
    let product_id = simple_product(&app, "stool", "Chairs").await;

    let uri = format!("/api/cart/{SESSION}/items");
    let (status, _) = post(&app, &uri, json!({ "product_id": product_id, "quantity": 10000 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(&app, &uri, json!({ "product_id": product_id, "quantity": 9999 })).await;
    assert_eq!(status, StatusCode::CREATED);
    let line = body["data"]["items"][0]["id"].as_i64().unwrap();

    let (status, _) = patch(&app, &format!("{uri}/{line}"), json!({ "quantity": 10000 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, &format!("/api/cart/{SESSION}")).await;
    assert_eq!(body["data"]["items"][0]["quantity"], 9999);
}

#[tokio::test]
async fn test_schema_allows_one_line_per_product() {
    let (app, db) = build_test_app().await;
    create_category(&app, "Chairs").await;
    let product_id = simple_product(&app, "rocker", "Chairs").await;

    let uri = format!("/api/cart/{SESSION}/items");
    post(&app, &uri, json!({ "product_id": product_id })).await;

    let owner = cart::Entity::find()
        .filter(cart::Column::SessionId.eq(SESSION))
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    let now = Utc::now();
    let duplicate = cart_item::ActiveModel {
        cart_id: Set(owner.id),
        product_id: Set(product_id as i32),
        name: Set("rocker".to_string()),
        description: Set(String::new()),
        image: Set(None),
        quantity: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await;
    assert!(duplicate.is_err());

    let (_, body) = post(&app, &uri, json!({ "product_id": product_id, "quantity": 4 })).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["items"][0]["quantity"], 5);
}

#[tokio::test]
async fn test_repeated_get_reuses_cart() {
    let (app, db) = build_test_app().await;

    get(&app, &format!("/api/cart/{SESSION}")).await;
    let (status, body) = get(&app, &format!("/api/cart/{SESSION}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["session_id"], SESSION);

    let carts = cart::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(carts.len(), 1);
}
