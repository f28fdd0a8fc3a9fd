use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{get, patch},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::api::admin::optional_text;
use crate::api::{begin, found, not_blank};
use crate::entities::task::{self, Entity as TaskEntity, Status};
use crate::middleware::logging::{success, success_message, ApiError};

pub fn admin_task_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/tasks", get(admin_get_tasks).post(create_task))
        .route("/tasks/:id", patch(patch_task).delete(delete_task))
        .layer(Extension(db))
}

async fn admin_get_tasks(
    Query(params): Query<TasksQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let mut query = TaskEntity::find();
    if let Some(status) = params.status {
        query = query.filter(task::Column::Status.eq(status));
    }
    let tasks = query
        .order_by_asc(task::Column::DueDate)
        .order_by_asc(task::Column::Id)
        .all(&txn)
        .await?;

    Ok(success(StatusCode::OK, tasks))
}

async fn create_task(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateTask>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let now = Utc::now();
    let created = task::ActiveModel {
        title: Set(payload.title),
        description: Set(payload.description.and_then(optional_text)),
        status: Set(payload.status.unwrap_or(Status::Pending)),
        due_date: Set(payload.due_date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    Ok(success(StatusCode::CREATED, created))
}

async fn patch_task(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchTask>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let txn = begin(&db).await?;

    let existing = found(TaskEntity::find_by_id(id).one(&txn).await?, "task", id)?;
    let mut entry: task::ActiveModel = existing.into();

    if let Some(title) = payload.title {
        entry.title = Set(title);
    }
    if let Some(description) = payload.description {
        entry.description = Set(optional_text(description));
    }
    if let Some(status) = payload.status {
        entry.status = Set(status);
    }
    if let Some(due_date) = payload.due_date {
        entry.due_date = Set(Some(due_date));
    }
    entry.updated_at = Set(Utc::now());

    let updated = entry.update(&txn).await?;
    txn.commit().await?;

    Ok(success(StatusCode::OK, updated))
}

async fn delete_task(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ApiError> {
    let txn = begin(&db).await?;
    let result = TaskEntity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("No task with {} id was found.", id)));
    }
    txn.commit().await?;

    Ok(success_message(StatusCode::OK, "Resource deleted successfully."))
}

#[derive(Deserialize)]
struct TasksQuery {
    status: Option<Status>,
}

#[derive(Deserialize, Validate)]
struct CreateTask {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    title: String,
    #[validate(length(max = 5000))]
    description: Option<String>,
    status: Option<Status>,
    due_date: Option<NaiveDate>,
}

#[derive(Deserialize, Validate)]
struct PatchTask {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    title: Option<String>,
    #[validate(length(max = 5000))]
    description: Option<String>,
    status: Option<Status>,
    due_date: Option<NaiveDate>,
}
