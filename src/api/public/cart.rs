use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::begin;
use crate::entities::{cart, cart::Entity as CartEntity, cart_item, product};
use crate::middleware::logging::{success, ApiError};

static SESSION_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{8,64}$").expect("valid session id regex"));

//ROUTERS
pub fn cart_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/cart", post(create_session))
        .route("/cart/:session_id", get(get_cart).delete(clear_cart))
        .route("/cart/:session_id/items", post(add_item))
        .route(
            "/cart/:session_id/items/:id",
            patch(patch_item).delete(remove_item),
        )
        .layer(Extension(db))
}

//ROUTES
async fn create_session(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let session_id = Uuid::new_v4().to_string();
    let cart = get_or_create_cart(&txn, &session_id).await?;
    let view = cart_view(&txn, cart).await?;
    txn.commit().await?;

    info!(session_id = %session_id, "Created cart session");
    Ok(success(StatusCode::CREATED, view))
}

async fn get_cart(
    Path(session_id): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    validate_session_id(&session_id)?;
    let txn = begin(&db).await?;
    let cart = get_or_create_cart(&txn, &session_id).await?;
    let view = cart_view(&txn, cart).await?;
    txn.commit().await?;

    Ok(success(StatusCode::OK, view))
}

async fn clear_cart(
    Path(session_id): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    validate_session_id(&session_id)?;
    let txn = begin(&db).await?;
    let cart = get_or_create_cart(&txn, &session_id).await?;
    let removed = clear_items(&txn, cart.id).await?;
    touch_cart(&txn, cart.id).await?;
    let view = cart_view(&txn, cart).await?;
    txn.commit().await?;

    info!(session_id = %session_id, removed, "Cleared cart");
    Ok(success(StatusCode::OK, view))
}

async fn add_item(
    Path(session_id): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<AddItem>,
) -> Result<Response, ApiError> {
    validate_session_id(&session_id)?;
    payload.validate()?;
    let quantity = payload.quantity.unwrap_or(1);

    let txn = begin(&db).await?;
    let prod = product::Entity::find_by_id(payload.product_id)
        .filter(product::Column::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No product with {} id was found",
                payload.product_id
            ))
        })?;

    let cart = get_or_create_cart(&txn, &session_id).await?;
    let now = Utc::now();

    // Single UPDATE so concurrent adds of the same product cannot lose an increment.
    let updated = cart_item::Entity::update_many()
        .col_expr(
            cart_item::Column::Quantity,
            Expr::col(cart_item::Column::Quantity).add(quantity),
        )
        .col_expr(cart_item::Column::UpdatedAt, Expr::value(now))
        .filter(cart_item::Column::CartId.eq(cart.id))
        .filter(cart_item::Column::ProductId.eq(prod.id))
        .exec(&txn)
        .await?;

    let status = if updated.rows_affected == 0 {
        let new_item = cart_item::ActiveModel {
            cart_id: Set(cart.id),
            product_id: Set(prod.id),
            name: Set(prod.name),
            description: Set(prod.description),
            image: Set(prod.image),
            quantity: Set(quantity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        // a concurrent first add of the same product lands on the unique index
        cart_item::Entity::insert(new_item)
            .on_conflict(
                OnConflict::columns([cart_item::Column::CartId, cart_item::Column::ProductId])
                    .value(
                        cart_item::Column::Quantity,
                        Expr::col((cart_item::Entity, cart_item::Column::Quantity)).add(quantity),
                    )
                    .value(cart_item::Column::UpdatedAt, Expr::value(now))
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    touch_cart(&txn, cart.id).await?;
    let view = cart_view(&txn, cart).await?;
    txn.commit().await?;

    Ok(success(status, view))
}

async fn patch_item(
    Path((session_id, id)): Path<(String, i32)>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchItem>,
) -> Result<Response, ApiError> {
    validate_session_id(&session_id)?;
    payload.validate()?;

    let txn = begin(&db).await?;
    let cart = find_cart(&txn, &session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No cart for session {session_id}")))?;
    let entry = find_item(&txn, cart.id, id).await?;

    if payload.quantity == 0 {
        cart_item::Entity::delete_by_id(entry.id).exec(&txn).await?;
    } else {
        let mut entry: cart_item::ActiveModel = entry.into();
        entry.quantity = Set(payload.quantity);
        entry.updated_at = Set(Utc::now());
        entry.update(&txn).await?;
    }

    touch_cart(&txn, cart.id).await?;
    let view = cart_view(&txn, cart).await?;
    txn.commit().await?;

    Ok(success(StatusCode::OK, view))
}

async fn remove_item(
    Path((session_id, id)): Path<(String, i32)>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    validate_session_id(&session_id)?;

    let txn = begin(&db).await?;
    let cart = find_cart(&txn, &session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No cart for session {session_id}")))?;
    let entry = find_item(&txn, cart.id, id).await?;
    cart_item::Entity::delete_by_id(entry.id).exec(&txn).await?;

    touch_cart(&txn, cart.id).await?;
    let view = cart_view(&txn, cart).await?;
    txn.commit().await?;

    Ok(success(StatusCode::OK, view))
}

//CART OPERATIONS
pub fn validate_session_id(session_id: &str) -> Result<(), ApiError> {
    if SESSION_ID_REGEX.is_match(session_id) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(
            "Invalid session id. It should be 8-64 Latin letters, numbers, '-' or '_'.".to_string(),
        ))
    }
}

pub async fn find_cart<C: ConnectionTrait>(
    conn: &C,
    session_id: &str,
) -> Result<Option<cart::Model>, DbErr> {
    CartEntity::find()
        .filter(cart::Column::SessionId.eq(session_id))
        .one(conn)
        .await
}

pub async fn get_or_create_cart<C: ConnectionTrait>(
    conn: &C,
    session_id: &str,
) -> Result<cart::Model, DbErr> {
    if let Some(cart) = find_cart(conn, session_id).await? {
        return Ok(cart);
    }

    let now = Utc::now();
    let new_cart = cart::ActiveModel {
        session_id: Set(session_id.to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    CartEntity::insert(new_cart)
        .on_conflict(
            OnConflict::column(cart::Column::SessionId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    find_cart(conn, session_id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("No cart for session {session_id}")))
}

pub async fn cart_items<C: ConnectionTrait>(
    conn: &C,
    cart_id: i32,
) -> Result<Vec<cart_item::Model>, DbErr> {
    cart_item::Entity::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .order_by_asc(cart_item::Column::Id)
        .all(conn)
        .await
}

/// Removes every line of the cart, returning how many were deleted.
pub async fn clear_items<C: ConnectionTrait>(conn: &C, cart_id: i32) -> Result<u64, DbErr> {
    let result = cart_item::Entity::delete_many()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

async fn find_item<C: ConnectionTrait>(
    conn: &C,
    cart_id: i32,
    id: i32,
) -> Result<cart_item::Model, ApiError> {
    cart_item::Entity::find_by_id(id)
        .filter(cart_item::Column::CartId.eq(cart_id))
        .one(conn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No related entry with {} id was found.", id)))
}

async fn touch_cart<C: ConnectionTrait>(conn: &C, cart_id: i32) -> Result<(), DbErr> {
    CartEntity::update_many()
        .col_expr(cart::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(cart::Column::Id.eq(cart_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn cart_view<C: ConnectionTrait>(conn: &C, cart: cart::Model) -> Result<CartResponse, DbErr> {
    let items = cart_items(conn, cart.id).await?;
    let total_items = items.iter().map(|item| item.quantity as i64).sum();
    Ok(CartResponse {
        session_id: cart.session_id,
        items,
        total_items,
    })
}

//Structs
#[derive(Deserialize, Validate, Debug)]
struct AddItem {
    product_id: i32,
    #[validate(range(min = 1, max = 9999))]
    quantity: Option<i32>,
}

#[derive(Deserialize, Validate)]
struct PatchItem {
    #[validate(range(min = 0, max = 9999))]
    quantity: i32,
}

#[derive(Serialize)]
struct CartResponse {
    session_id: String,
    items: Vec<cart_item::Model>,
    total_items: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_sessions_are_valid() {
        assert!(validate_session_id(&Uuid::new_v4().to_string()).is_ok());
    }

    #[test]
    fn rejects_short_or_unsafe_session_ids() {
        assert!(validate_session_id("abc").is_err());
        assert!(validate_session_id("../../etc/passwd").is_err());
        assert!(validate_session_id(&"a".repeat(65)).is_err());
    }
}
