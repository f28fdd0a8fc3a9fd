#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{json, Value};
use tower::ServiceExt;

use lb_premium::api::create_api_router;
use lb_premium::config::Config;
use lb_premium::entities::setup_schema;

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        uploads_dir: PathBuf::from("./tests/fixtures/uploads"),
        cors_origins: vec!["http://localhost:3000".to_string()],
        seed_defaults: false,
    }
}

/// In-memory SQLite lives as long as its single connection.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    setup_schema(&db).await.expect("Failed to create schema");
    db
}

pub async fn build_test_app() -> (Router, Arc<DatabaseConnection>) {
    let db = Arc::new(test_db().await);
    let app = create_api_router(db.clone(), &test_config());
    (app, db)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

pub async fn create_category(app: &Router, name: &str) -> i64 {
    let (status, body) = post(app, "/api/admin/categories", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "create category: {body}");
    body["data"]["id"].as_i64().unwrap()
}

pub async fn create_product(app: &Router, payload: Value) -> i64 {
    let (status, body) = post(app, "/api/admin/products", payload).await;
    assert_eq!(status, StatusCode::CREATED, "create product: {body}");
    body["data"]["id"].as_i64().unwrap()
}

pub async fn simple_product(app: &Router, name: &str, category: &str) -> i64 {
    create_product(
        app,
        json!({
            "name": name,
            "description": format!("{name} description"),
            "category": category,
            "image": format!("/uploads/{name}.jpg"),
        }),
    )
    .await
}
