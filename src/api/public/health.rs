use axum::{extract::Extension, http::StatusCode, response::Response, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;

use crate::middleware::logging::success;

pub fn health_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/health", get(health))
        .layer(Extension(db))
}

async fn health(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    let database = db.ping().await.is_ok();
    success(
        StatusCode::OK,
        json!({
            "status": "ok",
            "database": database,
        }),
    )
}
