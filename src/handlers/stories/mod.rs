//! Stories and their embedded sub-tasks.
//!
//! Story mutations and sub-task creation are admin-only; reads and sub-task
//! updates are also open to the story's assignee.

use axum::extract::Path;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Story, SubTask, TaskStatus};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::story_service::{
    CreateStoryData, NewSubTask, StoryService, StoryUpdate, SubTaskUpdate,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryRequest {
    pub project_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub point: Option<i32>,
    pub due: Option<DateTime<Utc>>,
    pub assignee_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStoryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub point: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

/// POST /stories (admin only)
pub async fn create(
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateStoryRequest>,
) -> ApiResult<Story> {
    let (project_id, title) = match (payload.project_id, payload.title) {
        (Some(project_id), Some(title)) => (project_id, title),
        _ => {
            return Err(ApiError::bad_request(
                "Both Title and Project Id are required",
            ))
        }
    };

    let story = StoryService::new()
        .await?
        .create(
            user.id,
            CreateStoryData {
                project_id,
                title,
                description: payload.description,
                point: payload.point,
                due: payload.due,
                assignee_id: payload.assignee_id,
            },
        )
        .await?;

    Ok(ApiResponse::data(story))
}

/// GET /stories/:storyId
pub async fn get_one(
    Extension(user): Extension<CurrentUser>,
    Path(story_id): Path<Uuid>,
) -> ApiResult<Story> {
    let story = StoryService::new().await?.get_one(story_id, &user).await?;
    Ok(ApiResponse::data(story))
}

/// PATCH /stories/:storyId
pub async fn update(
    Extension(user): Extension<CurrentUser>,
    Path(story_id): Path<Uuid>,
    Json(payload): Json<UpdateStoryRequest>,
) -> ApiResult {
    let update = StoryUpdate {
        title: payload.title,
        description: payload.description,
        point: payload.point,
    };

    if update.is_empty() {
        return Err(ApiError::bad_request("No update data provided"));
    }

    StoryService::new()
        .await?
        .update(story_id, &user, update)
        .await?;

    Ok(ApiResponse::no_content())
}

/// PATCH /stories/:storyId/archive
pub async fn archive(
    Extension(user): Extension<CurrentUser>,
    Path(story_id): Path<Uuid>,
) -> ApiResult {
    StoryService::new().await?.archive(story_id, &user).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /stories/:storyId/subTasks - add a sub-task (admin only)
pub async fn create_sub_task(
    Extension(user): Extension<CurrentUser>,
    Path(story_id): Path<Uuid>,
    Json(payload): Json<CreateSubTaskRequest>,
) -> ApiResult<SubTask> {
    let title = payload
        .title
        .ok_or_else(|| ApiError::bad_request("Title is required"))?;

    let sub_task = StoryService::new()
        .await?
        .create_sub_task(
            story_id,
            &user,
            NewSubTask {
                title,
                description: payload.description,
                due: payload.due,
            },
        )
        .await?;

    Ok(ApiResponse::created(sub_task))
}

/// GET /stories/:storyId/subTasks
pub async fn get_sub_tasks(
    Extension(user): Extension<CurrentUser>,
    Path(story_id): Path<Uuid>,
) -> ApiResult<Vec<SubTask>> {
    let sub_tasks = StoryService::new()
        .await?
        .get_sub_tasks(story_id, &user)
        .await?;
    Ok(ApiResponse::data(sub_tasks))
}

/// GET /stories/:storyId/subTasks/:subTaskId
pub async fn get_sub_task(
    Extension(user): Extension<CurrentUser>,
    Path((story_id, sub_task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<SubTask> {
    let sub_task = StoryService::new()
        .await?
        .get_sub_task(story_id, sub_task_id, &user)
        .await?;
    Ok(ApiResponse::data(sub_task))
}

/// PATCH /stories/:storyId/subTasks/:subTaskId
pub async fn update_sub_task(
    Extension(user): Extension<CurrentUser>,
    Path((story_id, sub_task_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateSubTaskRequest>,
) -> ApiResult {
    let update = SubTaskUpdate {
        title: payload.title,
        description: payload.description,
        due: payload.due,
        status: payload.status,
    };

    if update.is_empty() {
        return Err(ApiError::bad_request("No update data provided"));
    }

    StoryService::new()
        .await?
        .update_sub_task(story_id, sub_task_id, &user, update)
        .await?;

    Ok(ApiResponse::no_content())
}

/// DELETE /stories/:storyId/subTasks/:subTaskId
pub async fn delete_sub_task(
    Extension(user): Extension<CurrentUser>,
    Path((story_id, sub_task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult {
    StoryService::new()
        .await?
        .delete_sub_task(story_id, sub_task_id, &user)
        .await?;

    Ok(ApiResponse::no_content())
}
