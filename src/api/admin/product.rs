use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::api::admin::optional_text;
use crate::api::{begin, found, not_blank};
use crate::entities::{category, product, product::Entity as ProductEntity};
use crate::middleware::logging::{success, success_message, ApiError};

//ROUTERS
pub fn admin_product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/products", get(admin_get_products).post(create_product))
        .route(
            "/products/:id",
            get(admin_get_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .layer(Extension(db))
}

//ROUTES
async fn admin_get_products(
    Query(params): Query<AdminProductsQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;

    let mut condition = Condition::all();
    if let Some(active) = params.active {
        condition = condition.add(product::Column::IsActive.eq(active));
    }
    if let Some(featured) = params.featured {
        condition = condition.add(product::Column::IsFeatured.eq(featured));
    }
    if let Some(category) = params.category {
        condition = condition.add(product::Column::Category.eq(category));
    }
    if let Some(query) = params.query.filter(|value| !value.trim().is_empty()) {
        let mut query_condition = Condition::any().add(product::Column::Name.contains(query.trim()));
        if let Ok(id) = query.trim().parse::<i32>() {
            query_condition = query_condition.add(product::Column::Id.eq(id));
        }
        condition = condition.add(query_condition);
    }

    let products = ProductEntity::find()
        .filter(condition)
        .order_by_asc(product::Column::SortOrder)
        .order_by_asc(product::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, products))
}

async fn admin_get_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let prod = ProductEntity::find_by_id(id).one(&txn).await?;

    Ok(success(StatusCode::OK, found(prod, "product", id)?))
}

async fn create_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateProduct>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let category_name = payload.category.trim().to_string();
    ensure_category(&txn, &category_name).await?;

    let now = Utc::now();
    let new_product = product::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        category: Set(category_name),
        brand: Set(payload.brand.and_then(optional_text)),
        price: Set(payload.price),
        image: Set(payload.image.and_then(optional_text)),
        images: Set(serde_json::json!(payload.images.unwrap_or_default())),
        is_featured: Set(payload.is_featured.unwrap_or(false)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = new_product.insert(&txn).await?;
    txn.commit().await?;

    Ok(success(StatusCode::CREATED, created))
}

async fn patch_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchProduct>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let existing = found(ProductEntity::find_by_id(id).one(&txn).await?, "product", id)?;
    let mut prod: product::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        prod.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        prod.description = Set(description);
    }
    if let Some(category_name) = payload.category {
        let category_name = category_name.trim().to_string();
        ensure_category(&txn, &category_name).await?;
        prod.category = Set(category_name);
    }
    if let Some(brand) = payload.brand {
        prod.brand = Set(optional_text(brand));
    }
    if let Some(price) = payload.price {
        if price.is_some_and(|value| value < 0.0) {
            return Err(ApiError::ValidationFail(
                "price: must not be negative".to_string(),
            ));
        }
        prod.price = Set(price);
    }
    if let Some(image) = payload.image {
        prod.image = Set(optional_text(image));
    }
    if let Some(images) = payload.images {
        prod.images = Set(serde_json::json!(images));
    }
    if let Some(is_featured) = payload.is_featured {
        prod.is_featured = Set(is_featured);
    }
    if let Some(is_active) = payload.is_active {
        prod.is_active = Set(is_active);
    }
    if let Some(sort_order) = payload.sort_order {
        prod.sort_order = Set(sort_order);
    }
    prod.updated_at = Set(Utc::now());

    let updated = prod.update(&txn).await?;
    txn.commit().await?;

    Ok(success(StatusCode::OK, updated))
}

async fn delete_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let result = ProductEntity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!(
            "No product with {} id was found.",
            id
        )));
    }
    txn.commit().await?;

    Ok(success_message(StatusCode::OK, "Resource deleted successfully."))
}

async fn ensure_category(
    txn: &sea_orm::DatabaseTransaction,
    name: &str,
) -> Result<(), ApiError> {
    let exists = category::Entity::find()
        .filter(category::Column::Name.eq(name))
        .one(txn)
        .await?
        .is_some();
    if exists {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Unknown category {name}")))
    }
}

//Structs
#[derive(Deserialize)]
struct AdminProductsQuery {
    active: Option<bool>,
    featured: Option<bool>,
    category: Option<String>,
    query: Option<String>,
}

#[derive(Deserialize, Validate)]
struct CreateProduct {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    name: String,
    #[validate(length(max = 10000))]
    description: String,
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    category: String,
    #[validate(length(max = 120))]
    brand: Option<String>,
    #[validate(range(min = 0.0))]
    price: Option<f64>,
    #[validate(length(max = 512))]
    image: Option<String>,
    images: Option<Vec<String>>,
    is_featured: Option<bool>,
    is_active: Option<bool>,
    sort_order: Option<i32>,
}

#[derive(Deserialize, Validate)]
struct PatchProduct {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    name: Option<String>,
    #[validate(length(max = 10000))]
    description: Option<String>,
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    category: Option<String>,
    #[validate(length(max = 120))]
    brand: Option<String>,
    // absent keeps the price, null clears it
    #[serde(default, with = "serde_with::rust::double_option")]
    price: Option<Option<f64>>,
    #[validate(length(max = 512))]
    image: Option<String>,
    images: Option<Vec<String>>,
    is_featured: Option<bool>,
    is_active: Option<bool>,
    sort_order: Option<i32>,
}
