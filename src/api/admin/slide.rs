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
use crate::entities::slide::{self, Entity as SlideEntity};
use crate::middleware::logging::{success, success_message, ApiError};

pub fn admin_slide_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/slides", get(admin_get_slides).post(create_slide))
        .route(
            "/slides/:id",
            get(admin_get_slide).patch(patch_slide).delete(delete_slide),
        )
        .layer(Extension(db))
}

async fn admin_get_slides(
    Query(params): Query<AdminListQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let mut query = SlideEntity::find();
    if let Some(active) = params.active {
        query = query.filter(slide::Column::IsActive.eq(active));
    }
    let slides = query
        .order_by_asc(slide::Column::SortOrder)
        .order_by_asc(slide::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, slides))
}

async fn admin_get_slide(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let entry = SlideEntity::find_by_id(id).one(&txn).await?;

    Ok(success(StatusCode::OK, found(entry, "slide", id)?))
}

async fn create_slide(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateSlide>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let now = Utc::now();
    let created = slide::ActiveModel {
        title: Set(payload.title),
        subtitle: Set(payload.subtitle.and_then(optional_text)),
        image: Set(payload.image),
        link: Set(payload.link.and_then(optional_text)),
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

async fn patch_slide(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchSlide>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let existing = found(SlideEntity::find_by_id(id).one(&txn).await?, "slide", id)?;
    let mut entry: slide::ActiveModel = existing.into();

    if let Some(title) = payload.title {
        entry.title = Set(title);
    }
    if let Some(subtitle) = payload.subtitle {
        entry.subtitle = Set(optional_text(subtitle));
    }
    if let Some(image) = payload.image {
        entry.image = Set(image);
    }
    if let Some(link) = payload.link {
        entry.link = Set(optional_text(link));
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

async fn delete_slide(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let result = SlideEntity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("No slide with {} id was found.", id)));
    }
    txn.commit().await?;

    Ok(success_message(StatusCode::OK, "Resource deleted successfully."))
}

#[derive(Deserialize, Validate)]
struct CreateSlide {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    title: String,
    #[validate(length(max = 300))]
    subtitle: Option<String>,
    #[validate(length(min = 1, max = 512), custom(function = "not_blank"))]
    image: String,
    #[validate(length(max = 512))]
    link: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}

#[derive(Deserialize, Validate)]
struct PatchSlide {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    title: Option<String>,
    #[validate(length(max = 300))]
    subtitle: Option<String>,
    #[validate(length(min = 1, max = 512), custom(function = "not_blank"))]
    image: Option<String>,
    #[validate(length(max = 512))]
    link: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}
