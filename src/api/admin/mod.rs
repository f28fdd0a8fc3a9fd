pub mod about;
pub mod brand;
pub mod category;
pub mod client;
pub mod inquiry;
pub mod newsletter;
pub mod product;
pub mod service;
pub mod slide;
pub mod task;

use axum::Router;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;

pub fn admin_api_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .merge(category::admin_category_router(db.clone()))
        .merge(product::admin_product_router(db.clone()))
        .merge(slide::admin_slide_router(db.clone()))
        .merge(brand::admin_brand_router(db.clone()))
        .merge(service::admin_service_router(db.clone()))
        .merge(client::admin_client_router(db.clone()))
        .merge(about::admin_about_router(db.clone()))
        .merge(inquiry::admin_inquiry_router(db.clone()))
        .merge(newsletter::admin_newsletter_router(db.clone()))
        .merge(task::admin_task_router(db))
}

#[derive(Deserialize)]
pub(crate) struct AdminListQuery {
    pub active: Option<bool>,
}

/// Blank strings clear an optional column.
pub(crate) fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::optional_text;

    #[test]
    fn blank_text_clears() {
        assert_eq!(optional_text("   ".to_string()), None);
        assert_eq!(optional_text(" logo.png ".to_string()), Some("logo.png".to_string()));
    }
}
