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
use crate::entities::brand::{self, Entity as BrandEntity};
use crate::middleware::logging::{success, success_message, ApiError};

pub fn admin_brand_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/brands", get(admin_get_brands).post(create_brand))
        .route(
            "/brands/:id",
            get(admin_get_brand).patch(patch_brand).delete(delete_brand),
        )
        .layer(Extension(db))
}

async fn admin_get_brands(
    Query(params): Query<AdminListQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let mut query = BrandEntity::find();
    if let Some(active) = params.active {
        query = query.filter(brand::Column::IsActive.eq(active));
    }
    let brands = query
        .order_by_asc(brand::Column::SortOrder)
        .order_by_asc(brand::Column::Name)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, brands))
}

async fn admin_get_brand(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let entry = BrandEntity::find_by_id(id).one(&txn).await?;

    Ok(success(StatusCode::OK, found(entry, "brand", id)?))
}

async fn create_brand(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<BrandPayload>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let name = payload
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Brand name is required".to_string()))?;

    let txn = begin(&db).await?;
    let now = Utc::now();
    let created = brand::ActiveModel {
        name: Set(name),
        logo: Set(payload.logo.and_then(optional_text)),
        website: Set(payload.website.and_then(optional_text)),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(brand_conflict)?;
    txn.commit().await?;

    Ok(success(StatusCode::CREATED, created))
}

async fn patch_brand(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<BrandPayload>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let existing = found(BrandEntity::find_by_id(id).one(&txn).await?, "brand", id)?;
    let mut entry: brand::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        entry.name = Set(name.trim().to_string());
    }
    if let Some(logo) = payload.logo {
        entry.logo = Set(optional_text(logo));
    }
    if let Some(website) = payload.website {
        entry.website = Set(optional_text(website));
    }
    if let Some(sort_order) = payload.sort_order {
        entry.sort_order = Set(sort_order);
    }
    if let Some(is_active) = payload.is_active {
        entry.is_active = Set(is_active);
    }
    entry.updated_at = Set(Utc::now());

    let updated = entry.update(&txn).await.map_err(brand_conflict)?;
    txn.commit().await?;

    Ok(success(StatusCode::OK, updated))
}

async fn delete_brand(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let result = BrandEntity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("No brand with {} id was found.", id)));
    }
    txn.commit().await?;

    Ok(success_message(StatusCode::OK, "Resource deleted successfully."))
}

fn brand_conflict(err: sea_orm::DbErr) -> ApiError {
    match ApiError::from(err) {
        ApiError::Conflict(_) => ApiError::Conflict("Brand already exists".to_string()),
        other => other,
    }
}

// Create and patch share a payload, create checks the name itself.
#[derive(Deserialize, Validate)]
struct BrandPayload {
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    name: Option<String>,
    #[validate(length(max = 512))]
    logo: Option<String>,
    #[validate(length(max = 512))]
    website: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}
