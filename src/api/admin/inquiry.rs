use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::api::{begin, found};
use crate::entities::inquiry::{self, Entity as InquiryEntity, Status};
use crate::middleware::logging::{success, success_message, ApiError};

pub fn admin_inquiry_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/inquiries", get(admin_get_inquiries))
        .route(
            "/inquiries/:id",
            get(admin_get_inquiry).delete(delete_inquiry),
        )
        .route("/inquiries/:id/status", patch(patch_inquiry_status))
        .layer(Extension(db))
}

async fn admin_get_inquiries(
    Query(params): Query<InquiriesQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let mut query = InquiryEntity::find();
    if let Some(status) = params.status {
        query = query.filter(inquiry::Column::Status.eq(status));
    }
    let inquiries = query
        .order_by_desc(inquiry::Column::CreatedAt)
        .order_by_desc(inquiry::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, inquiries))
}

async fn admin_get_inquiry(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let entry = InquiryEntity::find_by_id(id).one(&txn).await?;

    Ok(success(StatusCode::OK, found(entry, "inquiry", id)?))
}

async fn patch_inquiry_status(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchStatus>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let existing = found(InquiryEntity::find_by_id(id).one(&txn).await?, "inquiry", id)?;
    let previous = existing.status;

    let mut entry: inquiry::ActiveModel = existing.into();
    entry.status = Set(payload.status);
    entry.updated_at = Set(Utc::now());
    let updated = entry.update(&txn).await?;
    txn.commit().await?;

    info!(inquiry_id = id, from = %previous, to = %payload.status, "Changed inquiry status");
    Ok(success(StatusCode::OK, updated))
}

async fn delete_inquiry(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let result = InquiryEntity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("No inquiry with {} id was found.", id)));
    }
    txn.commit().await?;

    Ok(success_message(StatusCode::OK, "Resource deleted successfully."))
}

#[derive(Deserialize)]
struct InquiriesQuery {
    status: Option<Status>,
}

#[derive(Deserialize)]
struct PatchStatus {
    status: Status,
}
