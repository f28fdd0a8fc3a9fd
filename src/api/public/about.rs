use axum::{extract::Extension, http::StatusCode, response::Response, routing::get, Router};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::sync::Arc;

use crate::api::begin;
use crate::entities::about::{self, Entity as AboutEntity};
use crate::middleware::logging::{success, ApiError};

pub fn about_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/about", get(get_about))
        .layer(Extension(db))
}

async fn get_about(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let about = AboutEntity::find()
        .order_by_asc(about::Column::Id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::NotFound("About section is not set".to_string()))?;

    Ok(success(StatusCode::OK, about))
}
