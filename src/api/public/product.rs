use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{begin, found};
use crate::entities::product::{self, Entity as ProductEntity};
use crate::middleware::logging::{success, ApiError};

pub const DEFAULT_PAGE_SIZE: u64 = 12;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Keeps the paginator offset `(page - 1) * limit` well inside `u64`.
pub const MAX_PAGE: u64 = u32::MAX as u64;
const RELATED_LIMIT: u64 = 4;

pub fn product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/products", get(get_products))
        .route("/products/:id", get(get_product))
        .route("/products/:id/related", get(get_related_products))
        .layer(Extension(db))
}

async fn get_products(
    Query(params): Query<GetProductsQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;

    let mut condition = Condition::all().add(product::Column::IsActive.eq(true));

    //Filter zone
    if let Some(category) = params.category.filter(|value| !value.is_empty()) {
        condition = condition.add(product::Column::Category.eq(category));
    }
    if let Some(brand) = params.brand.filter(|value| !value.is_empty()) {
        condition = condition.add(product::Column::Brand.eq(brand));
    }
    if Some(true) == params.featured {
        condition = condition.add(product::Column::IsFeatured.eq(true));
    }
    if let Some(search) = params.search.map(|value| value.trim().to_string()) {
        if !search.is_empty() {
            condition = condition.add(
                Condition::any()
                    .add(product::Column::Name.contains(search.clone()))
                    .add(product::Column::Description.contains(search)),
            );
        }
    }

    //Sorting zone
    let (sort_column, default_order) = match params.sort.unwrap_or_default() {
        ProductSort::Order => (product::Column::SortOrder, Order::Asc),
        ProductSort::Name => (product::Column::Name, Order::Asc),
        ProductSort::Newest => (product::Column::CreatedAt, Order::Desc),
        ProductSort::Price => (product::Column::Price, Order::Asc),
    };
    let order = match params.order {
        Some(SortDirection::Asc) => Order::Asc,
        Some(SortDirection::Desc) => Order::Desc,
        None => default_order,
    };

    let (page, limit) = page_bounds(params.page, params.limit);
    let paginator = ProductEntity::find()
        .filter(condition)
        .order_by(sort_column, order)
        .order_by_asc(product::Column::Id)
        .paginate(&txn, limit);

    let total = paginator.num_items().await?;
    let items: Vec<PublicProductResponse> = paginator
        .fetch_page(page - 1)
        .await?
        .into_iter()
        .map(PublicProductResponse::new)
        .collect();

    Ok(success(
        StatusCode::OK,
        ProductPage {
            items,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        },
    ))
}

async fn get_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let prod = ProductEntity::find_by_id(id)
        .filter(product::Column::IsActive.eq(true))
        .one(&txn)
        .await?;
    let prod = found(prod, "product", id)?;

    Ok(success(StatusCode::OK, PublicProductResponse::new(prod)))
}

async fn get_related_products(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let prod = ProductEntity::find_by_id(id)
        .filter(product::Column::IsActive.eq(true))
        .one(&txn)
        .await?;
    let prod = found(prod, "product", id)?;

    let related: Vec<PublicProductResponse> = ProductEntity::find()
        .filter(product::Column::IsActive.eq(true))
        .filter(product::Column::Category.eq(prod.category))
        .filter(product::Column::Id.ne(prod.id))
        .order_by_asc(product::Column::SortOrder)
        .order_by_asc(product::Column::Id)
        .limit(RELATED_LIMIT)
        .all(&txn)
        .await?
        .into_iter()
        .map(PublicProductResponse::new)
        .collect();

    Ok(success(StatusCode::OK, related))
}

/// Clamps the requested page (1-based) and page size.
pub fn page_bounds(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
enum ProductSort {
    #[default]
    Order,
    Name,
    Newest,
    Price,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
enum SortDirection {
    Asc,
    Desc,
}

#[derive(Deserialize)]
struct GetProductsQuery {
    category: Option<String>,
    brand: Option<String>,
    featured: Option<bool>,
    search: Option<String>,
    sort: Option<ProductSort>,
    order: Option<SortDirection>,
    page: Option<u64>,
    limit: Option<u64>,
}

#[derive(Serialize)]
struct ProductPage {
    items: Vec<PublicProductResponse>,
    total: u64,
    page: u64,
    limit: u64,
    total_pages: u64,
}

#[derive(Serialize)]
struct PublicProductResponse {
    id: i32,
    name: String,
    description: String,
    category: String,
    brand: Option<String>,
    price: Option<f64>,
    image: Option<String>,
    images: Vec<String>,
    is_featured: bool,
    created_at: DateTime<Utc>,
}

impl PublicProductResponse {
    fn new(value: product::Model) -> PublicProductResponse {
        let images = value.image_list();
        PublicProductResponse {
            id: value.id,
            name: value.name,
            description: value.description,
            category: value.category,
            brand: value.brand,
            price: value.price,
            image: value.image,
            images,
            is_featured: value.is_featured,
            created_at: value.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_defaults() {
        assert_eq!(page_bounds(None, None), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn page_bounds_clamps_out_of_range_values() {
        assert_eq!(page_bounds(Some(0), Some(0)), (1, 1));
        assert_eq!(page_bounds(Some(3), Some(1000)), (3, MAX_PAGE_SIZE));
        assert_eq!(page_bounds(Some(u64::MAX), None), (MAX_PAGE, DEFAULT_PAGE_SIZE));
    }
}
