use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::task::SubTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "story_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoryStatus {
    Todo,
    InProgress,
    Done,
    Archived,
}

/// Ticket within a project; sub-tasks are embedded as jsonb
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub point: Option<i32>,
    pub due: Option<DateTime<Utc>>,
    pub assignee_id: Option<Uuid>,
    pub status: StoryStatus,
    pub sub_tasks: Json<Vec<SubTask>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
