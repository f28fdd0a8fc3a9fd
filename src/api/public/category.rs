use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};

use crate::api::{begin, found};
use crate::entities::{category, category::Entity as CategoryEntity, product};
use crate::middleware::logging::{success, ApiError};

pub fn category_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/:id", get(get_category))
        .layer(Extension(db))
}

async fn get_categories(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;

    let categories = CategoryEntity::find()
        .filter(category::Column::IsActive.eq(true))
        .order_by_asc(category::Column::SortOrder)
        .order_by_asc(category::Column::Id)
        .all(&txn)
        .await?;

    let counts: HashMap<String, i64> = product::Entity::find()
        .select_only()
        .column(product::Column::Category)
        .column_as(Expr::col(product::Column::Id).count(), "product_count")
        .filter(product::Column::IsActive.eq(true))
        .group_by(product::Column::Category)
        .into_tuple::<(String, i64)>()
        .all(&txn)
        .await?
        .into_iter()
        .collect();

    let response: Vec<CategoryResponse> = categories
        .into_iter()
        .map(|categ| {
            let product_count = counts.get(&categ.name).copied().unwrap_or(0);
            CategoryResponse::new(categ, product_count)
        })
        .collect();
    Ok(success(StatusCode::OK, response))
}

async fn get_category(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;

    let categ = CategoryEntity::find_by_id(id)
        .filter(category::Column::IsActive.eq(true))
        .one(&txn)
        .await?;
    let categ = found(categ, "category", id)?;

    let product_count = product::Entity::find()
        .filter(product::Column::Category.eq(categ.name.clone()))
        .filter(product::Column::IsActive.eq(true))
        .count(&txn)
        .await?;

    Ok(success(
        StatusCode::OK,
        CategoryResponse::new(categ, product_count as i64),
    ))
}

#[derive(Serialize)]
struct CategoryResponse {
    id: i32,
    name: String,
    description: Option<String>,
    image: Option<String>,
    product_count: i64,
}

impl CategoryResponse {
    fn new(value: category::Model, product_count: i64) -> CategoryResponse {
        CategoryResponse {
            id: value.id,
            name: value.name,
            description: value.description,
            image: value.image,
            product_count,
        }
    }
}
