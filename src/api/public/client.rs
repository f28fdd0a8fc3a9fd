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
use crate::entities::client::{self, Entity as ClientEntity};
use crate::middleware::logging::{success, ApiError};

pub fn client_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/clients", get(get_clients))
        .route("/clients/:id", get(get_client))
        .layer(Extension(db))
}

async fn get_clients(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let clients = ClientEntity::find()
        .filter(client::Column::IsActive.eq(true))
        .order_by_asc(client::Column::SortOrder)
        .order_by_asc(client::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, clients))
}

async fn get_client(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let entry = ClientEntity::find_by_id(id)
        .filter(client::Column::IsActive.eq(true))
        .one(&txn)
        .await?;

    Ok(success(StatusCode::OK, found(entry, "client", id)?))
}
