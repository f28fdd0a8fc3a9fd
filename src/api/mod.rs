pub mod admin;
pub mod public;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    Router,
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;
use validator::ValidationError;

use crate::config::Config;
use crate::middleware::logging::{logging_middleware, ApiError};
use admin::admin_api_router;
use public::public_api_router;

pub fn create_api_router(shared_db: Arc<DatabaseConnection>, config: &Config) -> Router {
    let api = public_api_router(shared_db.clone()).nest("/admin", admin_api_router(shared_db));

    Router::new()
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

pub(crate) async fn begin(db: &DatabaseConnection) -> Result<DatabaseTransaction, ApiError> {
    db.begin()
        .await
        .map_err(|_| ApiError::TransactionCreationFailed)
}

/// Turns a missing row into a 404 with a readable message.
pub(crate) fn found<T>(value: Option<T>, what: &str, id: i32) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::NotFound(format!("No {what} with {id} id was found.")))
}

/// Rejects text that is empty once surrounding whitespace is trimmed.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert!(not_blank("   ").is_err());
        assert!(not_blank("\t\n").is_err());
        assert!(not_blank(" Oak ").is_ok());
    }
}
