use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::json;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed = start.elapsed();
    match response.extensions().get::<Result<(), ApiError>>() {
        Some(Ok(_)) => info!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            "Processed request"
        ),
        Some(Err(value)) => error!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            value = %value,
            "Failed to process request"
        ),
        None => debug!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            "Processed request without an api result"
        ),
    }

    response
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum ApiError {
    #[error("Failed to create transaction")]
    TransactionCreationFailed,
    #[error("Database error: {0}")]
    DbError(String),
    #[error("Failed to validate: {0}")]
    ValidationFail(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    General(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ValidationFail(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TransactionCreationFailed | ApiError::DbError(_) | ApiError::General(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client. Internal failures never leak their details.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::TransactionCreationFailed | ApiError::DbError(_) | ApiError::General(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return ApiError::Conflict(format!("Resource already exists: {detail}"));
        }
        match err {
            DbErr::RecordNotFound(value) => ApiError::NotFound(value),
            DbErr::RecordNotUpdated => ApiError::NotFound("Resource not found".to_string()),
            other => ApiError::DbError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationFail(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "success": false,
            "error": self.public_message(),
        }));
        to_response((status, body), Err(self))
    }
}

pub fn to_response<T: IntoResponse>(
    response: T,               //The response that we are sending + StatusCode
    ext: Result<(), ApiError>, //The extension, that we want to give logging middleware
) -> Response {
    let mut response = response.into_response();

    response.extensions_mut().insert(ext);

    response
}

/// Wraps `data` in the success envelope.
pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    to_response(
        (
            status,
            Json(json!({
                "success": true,
                "data": data,
            })),
        ),
        Ok(()),
    )
}

pub fn success_message(status: StatusCode, message: &str) -> Response {
    to_response(
        (
            status,
            Json(json!({
                "success": true,
                "message": message,
            })),
        ),
        Ok(()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::DbError("connection reset".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn record_not_found_maps_to_404() {
        let err: ApiError = DbErr::RecordNotFound("cart".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "cart");
    }

    #[test]
    fn error_response_carries_extension() {
        let response = ApiError::Conflict("Category already exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(matches!(
            response.extensions().get::<Result<(), ApiError>>(),
            Some(Err(ApiError::Conflict(_)))
        ));
    }
}
