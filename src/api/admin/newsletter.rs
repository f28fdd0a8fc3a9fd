use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{delete, get},
    Router,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;

use crate::api::admin::AdminListQuery;
use crate::api::begin;
use crate::entities::newsletter_subscriber::{self, Entity as SubscriberEntity};
use crate::middleware::logging::{success, success_message, ApiError};

pub fn admin_newsletter_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/newsletter", get(admin_get_subscribers))
        .route("/newsletter/:id", delete(delete_subscriber))
        .layer(Extension(db))
}

async fn admin_get_subscribers(
    Query(params): Query<AdminListQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let mut query = SubscriberEntity::find();
    if let Some(active) = params.active {
        query = query.filter(newsletter_subscriber::Column::IsActive.eq(active));
    }
    let subscribers = query
        .order_by_desc(newsletter_subscriber::Column::CreatedAt)
        .order_by_desc(newsletter_subscriber::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, subscribers))
}

async fn delete_subscriber(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let result = SubscriberEntity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!(
            "No subscriber with {} id was found.",
            id
        )));
    }
    txn.commit().await?;

    Ok(success_message(StatusCode::OK, "Resource deleted successfully."))
}
