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
use crate::entities::service::{self, Entity as ServiceEntity};
use crate::middleware::logging::{success, ApiError};

pub fn service_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/services", get(get_services))
        .route("/services/:id", get(get_service))
        .layer(Extension(db))
}

async fn get_services(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let services = ServiceEntity::find()
        .filter(service::Column::IsActive.eq(true))
        .order_by_asc(service::Column::SortOrder)
        .order_by_asc(service::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, services))
}

async fn get_service(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let entry = ServiceEntity::find_by_id(id)
        .filter(service::Column::IsActive.eq(true))
        .one(&txn)
        .await?;

    Ok(success(StatusCode::OK, found(entry, "service", id)?))
}
