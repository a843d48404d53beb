//! Personal task board on the admin account (embedded task list).

use axum::extract::Path;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Task, TaskStatus};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::admin_service::{AdminService, NewTask, TaskUpdate};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

/// PATCH /admins/me/tasks - add a task to the board
pub async fn create_task(
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<Task> {
    let (title, due) = match (payload.title, payload.due) {
        (Some(title), Some(due)) => (title, due),
        _ => return Err(ApiError::bad_request("Both Title and Due Date are required")),
    };

    let task = AdminService::new()
        .await?
        .create_task(
            user.id,
            NewTask {
                title,
                description: payload.description,
                due,
            },
        )
        .await?;

    Ok(ApiResponse::created(task))
}

/// GET /admins/me/tasks
pub async fn get_tasks(Extension(user): Extension<CurrentUser>) -> ApiResult<Vec<Task>> {
    let tasks = AdminService::new().await?.get_tasks(user.id).await?;
    Ok(ApiResponse::data(tasks))
}

/// PATCH /admins/me/tasks/:taskId
pub async fn update_task(
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult {
    let update = TaskUpdate {
        title: payload.title,
        description: payload.description,
        due: payload.due,
        status: payload.status,
    };

    if update.is_empty() {
        return Err(ApiError::bad_request("Update data is required"));
    }

    AdminService::new()
        .await?
        .update_task(user.id, task_id, update)
        .await?;

    Ok(ApiResponse::no_content())
}

/// PATCH /admins/me/tasks/:taskId/delete
pub async fn delete_task(
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
) -> ApiResult {
    AdminService::new()
        .await?
        .delete_task(user.id, task_id)
        .await?;

    Ok(ApiResponse::no_content())
}
