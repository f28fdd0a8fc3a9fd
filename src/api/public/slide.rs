use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;

use crate::api::{begin, found};
use crate::entities::slide::{self, Entity as SlideEntity};
use crate::middleware::logging::{success, ApiError};

pub fn slide_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/slides", get(get_slides))
        .route("/slides/:id", get(get_slide))
        .layer(Extension(db))
}

async fn get_slides(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let slides = SlideEntity::find()
        .filter(slide::Column::IsActive.eq(true))
        .order_by_asc(slide::Column::SortOrder)
        .order_by_asc(slide::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, slides))
}

async fn get_slide(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let entry = SlideEntity::find_by_id(id)
        .filter(slide::Column::IsActive.eq(true))
        .one(&txn)
        .await?;

    Ok(success(StatusCode::OK, found(entry, "slide", id)?))
}
