use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::api::admin::{optional_text, AdminListQuery};
use crate::api::{begin, found, not_blank};
use crate::entities::service::{self, Entity as ServiceEntity};
use crate::middleware::logging::{success, success_message, ApiError};

pub fn admin_service_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/services", get(admin_get_services).post(create_service))
        .route(
            "/services/:id",
            get(admin_get_service)
                .patch(patch_service)
                .delete(delete_service),
        )
        .layer(Extension(db))
}

async fn admin_get_services(
    Query(params): Query<AdminListQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let mut query = ServiceEntity::find();
    if let Some(active) = params.active {
        query = query.filter(service::Column::IsActive.eq(active));
    }
    let services = query
        .order_by_asc(service::Column::SortOrder)
        .order_by_asc(service::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, services))
}

async fn admin_get_service(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let entry = ServiceEntity::find_by_id(id).one(&txn).await?;

    Ok(success(StatusCode::OK, found(entry, "service", id)?))
}

async fn create_service(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateService>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let now = Utc::now();
    let created = service::ActiveModel {
        title: Set(payload.title),
        description: Set(payload.description),
        icon: Set(payload.icon.and_then(optional_text)),
        image: Set(payload.image.and_then(optional_text)),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    Ok(success(StatusCode::CREATED, created))
}

async fn patch_service(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchService>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let existing = found(ServiceEntity::find_by_id(id).one(&txn).await?, "service", id)?;
    let mut entry: service::ActiveModel = existing.into();

    if let Some(title) = payload.title {
        entry.title = Set(title);
    }
    if let Some(description) = payload.description {
        entry.description = Set(description);
    }
    if let Some(icon) = payload.icon {
        entry.icon = Set(optional_text(icon));
    }
    if let Some(image) = payload.image {
        entry.image = Set(optional_text(image));
    }
    if let Some(sort_order) = payload.sort_order {
        entry.sort_order = Set(sort_order);
    }
    if let Some(is_active) = payload.is_active {
        entry.is_active = Set(is_active);
    }
    entry.updated_at = Set(Utc::now());

    let updated = entry.update(&txn).await?;
    txn.commit().await?;

    Ok(success(StatusCode::OK, updated))
}

async fn delete_service(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let result = ServiceEntity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("No service with {} id was found.", id)));
    }
    txn.commit().await?;

    Ok(success_message(StatusCode::OK, "Resource deleted successfully."))
}

#[derive(Deserialize, Validate)]
struct CreateService {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    title: String,
    #[validate(length(max = 5000))]
    description: String,
    #[validate(length(max = 120))]
    icon: Option<String>,
    #[validate(length(max = 512))]
    image: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}

#[derive(Deserialize, Validate)]
struct PatchService {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    title: Option<String>,
    #[validate(length(max = 5000))]
    description: Option<String>,
    #[validate(length(max = 120))]
    icon: Option<String>,
    #[validate(length(max = 512))]
    image: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}
