pub mod about;
pub mod brand;
pub mod cart;
pub mod category;
pub mod client;
pub mod health;
pub mod inquiry;
pub mod newsletter;
pub mod product;
pub mod service;
pub mod slide;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub fn public_api_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .merge(health::health_router(db.clone()))
        .merge(category::category_router(db.clone()))
        .merge(product::product_router(db.clone()))
        .merge(slide::slide_router(db.clone()))
        .merge(brand::brand_router(db.clone()))
        .merge(service::service_router(db.clone()))
        .merge(client::client_router(db.clone()))
        .merge(about::about_router(db.clone()))
        .merge(cart::cart_router(db.clone()))
        .merge(inquiry::inquiry_router(db.clone()))
        .merge(newsletter::newsletter_router(db))
}
