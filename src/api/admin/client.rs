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
use crate::entities::client::{self, Entity as ClientEntity};
use crate::middleware::logging::{success, success_message, ApiError};

pub fn admin_client_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/clients", get(admin_get_clients).post(create_client))
        .route(
            "/clients/:id",
            get(admin_get_client)
                .patch(patch_client)
                .delete(delete_client),
        )
        .layer(Extension(db))
}

async fn admin_get_clients(
    Query(params): Query<AdminListQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let mut query = ClientEntity::find();
    if let Some(active) = params.active {
        query = query.filter(client::Column::IsActive.eq(active));
    }
    let clients = query
        .order_by_asc(client::Column::SortOrder)
        .order_by_asc(client::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, clients))
}

async fn admin_get_client(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let entry = ClientEntity::find_by_id(id).one(&txn).await?;

    Ok(success(StatusCode::OK, found(entry, "client", id)?))
}

async fn create_client(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateClient>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let now = Utc::now();
    let created = client::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        logo: Set(payload.logo.and_then(optional_text)),
        website: Set(payload.website.and_then(optional_text)),
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

async fn patch_client(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchClient>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let existing = found(ClientEntity::find_by_id(id).one(&txn).await?, "client", id)?;
    let mut entry: client::ActiveModel = existing.into();

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

    let updated = entry.update(&txn).await?;
    txn.commit().await?;

    Ok(success(StatusCode::OK, updated))
}

async fn delete_client(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let result = ClientEntity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("No client with {} id was found.", id)));
    }
    txn.commit().await?;

    Ok(success_message(StatusCode::OK, "Resource deleted successfully."))
}

#[derive(Deserialize, Validate)]
struct CreateClient {
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    name: String,
    #[validate(length(max = 512))]
    logo: Option<String>,
    #[validate(length(max = 512))]
    website: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}

#[derive(Deserialize, Validate)]
struct PatchClient {
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    name: Option<String>,
    #[validate(length(max = 512))]
    logo: Option<String>,
    #[validate(length(max = 512))]
    website: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}
