use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::{Story, SubTask, TaskStatus};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::project_service::ProjectService;

#[derive(Debug)]
pub struct CreateStoryData {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub point: Option<i32>,
    pub due: Option<DateTime<Utc>>,
    pub assignee_id: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct StoryUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub point: Option<i32>,
}

impl StoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.point.is_none()
    }
}

#[derive(Debug)]
pub struct NewSubTask {
    pub title: String,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct SubTaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

impl SubTaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due.is_none()
            && self.status.is_none()
    }
}

pub struct StoryService {
    pool: PgPool,
}

impl StoryService {
    pub async fn new() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn create(&self, admin_id: Uuid, data: CreateStoryData) -> Result<Story, ApiError> {
        ProjectService::new()
            .await?
            .ensure_belongs_to_admin(data.project_id, admin_id)
            .await?;

        let story = sqlx::query_as::<_, Story>(
            r#"
            INSERT INTO stories (project_id, title, description, point, due, assignee_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.project_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.point)
        .bind(data.due)
        .bind(data.assignee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(story)
    }

    pub async fn get_one(&self, id: Uuid, user: &CurrentUser) -> Result<Story, ApiError> {
        self.fetch_authorized(id, user).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        user: &CurrentUser,
        update: StoryUpdate,
    ) -> Result<(), ApiError> {
        self.fetch_authorized(id, user).await?;

        sqlx::query(
            r#"
            UPDATE stories
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                point = COALESCE($4, point),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.title)
        .bind(update.description)
        .bind(update.point)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn archive(&self, id: Uuid, user: &CurrentUser) -> Result<(), ApiError> {
        self.fetch_authorized(id, user).await?;

        sqlx::query("UPDATE stories SET status = 'ARCHIVED', updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn create_sub_task(
        &self,
        story_id: Uuid,
        user: &CurrentUser,
        input: NewSubTask,
    ) -> Result<SubTask, ApiError> {
        let story = self.fetch_authorized(story_id, user).await?;

        let sub_task = SubTask {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            due: input.due,
            status: TaskStatus::Todo,
        };

        let mut sub_tasks = story.sub_tasks.0;
        sub_tasks.push(sub_task.clone());
        self.store_sub_tasks(story_id, &sub_tasks).await?;

        Ok(sub_task)
    }

    pub async fn get_sub_tasks(
        &self,
        story_id: Uuid,
        user: &CurrentUser,
    ) -> Result<Vec<SubTask>, ApiError> {
        let story = self.fetch_authorized(story_id, user).await?;
        Ok(story.sub_tasks.0)
    }

    pub async fn get_sub_task(
        &self,
        story_id: Uuid,
        sub_task_id: Uuid,
        user: &CurrentUser,
    ) -> Result<SubTask, ApiError> {
        let story = self.fetch_authorized(story_id, user).await?;

        story
            .sub_tasks
            .0
            .into_iter()
            .find(|t| t.id == sub_task_id)
            .ok_or_else(|| ApiError::not_found("Sub-task does not exist"))
    }

    pub async fn update_sub_task(
        &self,
        story_id: Uuid,
        sub_task_id: Uuid,
        user: &CurrentUser,
        update: SubTaskUpdate,
    ) -> Result<(), ApiError> {
        let story = self.fetch_authorized(story_id, user).await?;

        let mut sub_tasks = story.sub_tasks.0;
        let sub_task = sub_tasks
            .iter_mut()
            .find(|t| t.id == sub_task_id)
            .ok_or_else(|| ApiError::not_found("Sub-task does not exist"))?;

        if let Some(title) = update.title {
            sub_task.title = title;
        }
        if let Some(description) = update.description {
            sub_task.description = Some(description);
        }
        if let Some(due) = update.due {
            sub_task.due = Some(due);
        }
        if let Some(status) = update.status {
            sub_task.status = status;
        }

        self.store_sub_tasks(story_id, &sub_tasks).await
    }

    pub async fn delete_sub_task(
        &self,
        story_id: Uuid,
        sub_task_id: Uuid,
        user: &CurrentUser,
    ) -> Result<(), ApiError> {
        let story = self.fetch_authorized(story_id, user).await?;

        let sub_tasks = story.sub_tasks.0;
        let remaining: Vec<SubTask> = sub_tasks
            .iter()
            .filter(|t| t.id != sub_task_id)
            .cloned()
            .collect();
        if remaining.len() == sub_tasks.len() {
            return Err(ApiError::not_found("Sub-task does not exist"));
        }

        self.store_sub_tasks(story_id, &remaining).await
    }

    /// Load the story and enforce access: admins must own the parent project,
    /// team members must be the story's assignee.
    async fn fetch_authorized(&self, id: Uuid, user: &CurrentUser) -> Result<Story, ApiError> {
        let story = sqlx::query_as::<_, Story>("SELECT * FROM stories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Story does not exist"))?;

        match user.role {
            Role::Admin => {
                let owner: Option<Uuid> =
                    sqlx::query_scalar("SELECT admin_id FROM projects WHERE id = $1")
                        .bind(story.project_id)
                        .fetch_optional(&self.pool)
                        .await?;

                if owner != Some(user.id) {
                    return Err(ApiError::not_yours());
                }
            }
            Role::TeamMember => {
                if story.assignee_id != Some(user.id) {
                    return Err(ApiError::not_yours());
                }
            }
        }

        Ok(story)
    }

    async fn store_sub_tasks(&self, story_id: Uuid, sub_tasks: &[SubTask]) -> Result<(), ApiError> {
        sqlx::query("UPDATE stories SET sub_tasks = $2, updated_at = now() WHERE id = $1")
            .bind(story_id)
            .bind(Json(sub_tasks))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
