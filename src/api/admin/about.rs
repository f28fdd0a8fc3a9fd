use axum::{
    extract::Extension, http::StatusCode, response::Response, routing::put, Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TryIntoModel,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::api::admin::optional_text;
use crate::api::{begin, not_blank};
use crate::entities::about::{self, Entity as AboutEntity};
use crate::middleware::logging::{success, ApiError};

pub fn admin_about_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/about", put(put_about))
        .layer(Extension(db))
}

/// Replaces the about section, creating it on first use.
async fn put_about(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PutAbout>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let existing = AboutEntity::find()
        .order_by_asc(about::Column::Id)
        .one(&txn)
        .await?;

    let (mut entry, status): (about::ActiveModel, StatusCode) = match existing {
        Some(model) => (model.into(), StatusCode::OK),
        None => (
            about::ActiveModel {
                ..Default::default()
            },
            StatusCode::CREATED,
        ),
    };
    entry.title = Set(payload.title);
    entry.content = Set(payload.content);
    entry.image = Set(payload.image.and_then(optional_text));
    entry.mission = Set(payload.mission.and_then(optional_text));
    entry.vision = Set(payload.vision.and_then(optional_text));
    entry.updated_at = Set(Utc::now());

    let saved = entry.save(&txn).await?.try_into_model()?;
    txn.commit().await?;

    Ok(success(status, saved))
}

#[derive(Deserialize, Validate)]
struct PutAbout {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    title: String,
    #[validate(length(min = 1, max = 20000), custom(function = "not_blank"))]
    content: String,
    #[validate(length(max = 512))]
    image: Option<String>,
    #[validate(length(max = 5000))]
    mission: Option<String>,
    #[validate(length(max = 5000))]
    vision: Option<String>,
}
