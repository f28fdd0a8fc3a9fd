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
use crate::entities::brand::{self, Entity as BrandEntity};
use crate::middleware::logging::{success, ApiError};

pub fn brand_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/brands", get(get_brands))
        .route("/brands/:id", get(get_brand))
        .layer(Extension(db))
}

async fn get_brands(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let brands = BrandEntity::find()
        .filter(brand::Column::IsActive.eq(true))
        .order_by_asc(brand::Column::SortOrder)
        .order_by_asc(brand::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, brands))
}

async fn get_brand(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let entry = BrandEntity::find_by_id(id)
        .filter(brand::Column::IsActive.eq(true))
        .one(&txn)
        .await?;

    Ok(success(StatusCode::OK, found(entry, "brand", id)?))
}
