use axum::{
    extract::Extension, http::StatusCode, response::Response, routing::post, Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::api::begin;
use crate::entities::newsletter_subscriber::{self, normalize_email, Entity as SubscriberEntity};
use crate::middleware::logging::{success, ApiError};

pub fn newsletter_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/newsletter/subscribe", post(subscribe))
        .route("/newsletter/unsubscribe", post(unsubscribe))
        .layer(Extension(db))
}

async fn subscribe(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<EmailPayload>,
) -> Result<Response, ApiError> {
    let email = normalize_email(&payload.email);
    EmailPayload { email: email.clone() }.validate()?;

    let txn = begin(&db).await?;
    let existing = SubscriberEntity::find()
        .filter(newsletter_subscriber::Column::Email.eq(email.clone()))
        .one(&txn)
        .await?;
    let now = Utc::now();

    let response = match existing {
        Some(subscriber) if subscriber.is_active => success(
            StatusCode::OK,
            json!({
                "email": subscriber.email,
                "already_subscribed": true,
            }),
        ),
        Some(subscriber) => {
            let mut subscriber: newsletter_subscriber::ActiveModel = subscriber.into();
            subscriber.is_active = Set(true);
            subscriber.updated_at = Set(now);
            let subscriber = subscriber.update(&txn).await?;
            success(
                StatusCode::OK,
                json!({
                    "email": subscriber.email,
                    "already_subscribed": false,
                }),
            )
        }
        None => {
            let subscriber = newsletter_subscriber::ActiveModel {
                email: Set(email),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            success(
                StatusCode::CREATED,
                json!({
                    "email": subscriber.email,
                    "already_subscribed": false,
                }),
            )
        }
    };
    txn.commit().await?;

    Ok(response)
}

async fn unsubscribe(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<EmailPayload>,
) -> Result<Response, ApiError> {
    let email = normalize_email(&payload.email);

    let txn = begin(&db).await?;
    let subscriber = SubscriberEntity::find()
        .filter(newsletter_subscriber::Column::Email.eq(email.clone()))
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{email} is not subscribed")))?;

    let mut subscriber: newsletter_subscriber::ActiveModel = subscriber.into();
    subscriber.is_active = Set(false);
    subscriber.updated_at = Set(Utc::now());
    let subscriber = subscriber.update(&txn).await?;
    txn.commit().await?;

    Ok(success(
        StatusCode::OK,
        json!({
            "email": subscriber.email,
            "is_active": subscriber.is_active,
        }),
    ))
}

#[derive(Deserialize, Validate)]
struct EmailPayload {
    #[validate(email)]
    email: String,
}
