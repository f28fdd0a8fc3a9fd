use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::api::admin::{optional_text, AdminListQuery};
use crate::api::{begin, found, not_blank};
use crate::entities::{category, category::Entity as CategoryEntity, product};
use crate::middleware::logging::{success, success_message, ApiError};

//ROUTERS
pub fn admin_category_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route(
            "/categories",
            get(admin_get_categories).post(create_category),
        )
        .route(
            "/categories/:id",
            get(admin_get_category)
                .patch(patch_category)
                .delete(delete_category),
        )
        .layer(Extension(db))
}

//ROUTES
async fn admin_get_categories(
    Query(params): Query<AdminListQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let mut query = CategoryEntity::find();
    if let Some(active) = params.active {
        query = query.filter(category::Column::IsActive.eq(active));
    }
    let categories = query
        .order_by_asc(category::Column::SortOrder)
        .order_by_asc(category::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, categories))
}

async fn admin_get_category(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let categ = CategoryEntity::find_by_id(id).one(&txn).await?;

    Ok(success(StatusCode::OK, found(categ, "category", id)?))
}

async fn create_category(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateCategory>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let now = Utc::now();
    let new_category = category::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description.and_then(optional_text)),
        image: Set(payload.image.and_then(optional_text)),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = new_category.insert(&txn).await.map_err(|err| match ApiError::from(err) {
        ApiError::Conflict(_) => ApiError::Conflict("Category already exists".to_string()),
        other => other,
    })?;
    txn.commit().await?;

    Ok(success(StatusCode::CREATED, created))
}

async fn patch_category(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchCategory>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let existing = found(CategoryEntity::find_by_id(id).one(&txn).await?, "category", id)?;
    let old_name = existing.name.clone();
    let mut categ: category::ActiveModel = existing.into();

    let renamed_to = payload
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| *name != old_name);
    if let Some(name) = renamed_to.clone() {
        categ.name = Set(name);
    }
    if let Some(description) = payload.description {
        categ.description = Set(optional_text(description));
    }
    if let Some(image) = payload.image {
        categ.image = Set(optional_text(image));
    }
    if let Some(sort_order) = payload.sort_order {
        categ.sort_order = Set(sort_order);
    }
    if let Some(is_active) = payload.is_active {
        categ.is_active = Set(is_active);
    }
    categ.updated_at = Set(Utc::now());

    let updated = categ.update(&txn).await.map_err(|err| match ApiError::from(err) {
        ApiError::Conflict(_) => ApiError::Conflict("Category already exists".to_string()),
        other => other,
    })?;

    // products link to categories by name
    if let Some(new_name) = renamed_to {
        let moved = product::Entity::update_many()
            .col_expr(product::Column::Category, Expr::value(new_name.clone()))
            .filter(product::Column::Category.eq(old_name.clone()))
            .exec(&txn)
            .await?;
        info!(
            from = %old_name,
            to = %new_name,
            products = moved.rows_affected,
            "Renamed category"
        );
    }
    txn.commit().await?;

    Ok(success(StatusCode::OK, updated))
}

async fn delete_category(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let result = CategoryEntity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!(
            "No category with {} id was found.",
            id
        )));
    }
    txn.commit().await?;

    Ok(success_message(StatusCode::OK, "Resource deleted successfully."))
}

//Struct
#[derive(Deserialize, Validate, Debug)]
struct CreateCategory {
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    name: String,
    #[validate(length(max = 2000))]
    description: Option<String>,
    #[validate(length(max = 512))]
    image: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}

#[derive(Deserialize, Validate)]
struct PatchCategory {
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    name: Option<String>,
    #[validate(length(max = 2000))]
    description: Option<String>,
    #[validate(length(max = 512))]
    image: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}
