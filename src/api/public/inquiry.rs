use axum::{
    extract::Extension, http::StatusCode, response::Response, routing::post, Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::api::{begin, not_blank};
use crate::api::public::cart::{cart_items, clear_items, find_cart, validate_session_id};
use crate::entities::{cart_item::ProductSnapshot, inquiry};
use crate::middleware::logging::{success, ApiError};

pub fn inquiry_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/inquiries", post(create_inquiry))
        .layer(Extension(db))
}

async fn create_inquiry(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateInquiry>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    if let Some(session_id) = payload.session_id.as_deref() {
        validate_session_id(session_id)?;
    }
    if let Some(products) = payload.products.as_ref() {
        if products.iter().any(|line| line.quantity < 1) {
            return Err(ApiError::BadRequest(
                "Quantity should be greater than 0".to_string(),
            ));
        }
    }

    let txn = begin(&db).await?;

    let cart = match payload.session_id.as_deref() {
        Some(session_id) => find_cart(&txn, session_id).await?,
        None => None,
    };

    let products: Vec<ProductSnapshot> = match (payload.products, cart.as_ref()) {
        (Some(products), _) => products,
        (None, Some(cart)) => cart_items(&txn, cart.id)
            .await?
            .iter()
            .map(ProductSnapshot::from)
            .collect(),
        (None, None) => Vec::new(),
    };
    let products =
        serde_json::to_value(&products).map_err(|err| ApiError::General(err.to_string()))?;

    let now = Utc::now();
    let created = inquiry::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        phone: Set(payload.phone),
        company: Set(payload.company),
        message: Set(payload.message),
        products: Set(products),
        status: Set(inquiry::Status::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(cart) = cart {
        clear_items(&txn, cart.id).await?;
    }
    txn.commit().await?;

    info!(inquiry_id = created.id, "Received inquiry");
    Ok(success(StatusCode::CREATED, created))
}

#[derive(Deserialize, Validate)]
struct CreateInquiry {
    #[validate(length(min = 1, max = 120), custom(function = "not_blank"))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(max = 40))]
    phone: Option<String>,
    #[validate(length(max = 120))]
    company: Option<String>,
    #[validate(length(min = 1, max = 5000), custom(function = "not_blank"))]
    message: String,
    products: Option<Vec<ProductSnapshot>>,
    session_id: Option<String>,
}
