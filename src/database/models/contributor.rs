use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "contributor_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributorStatus {
    Active,
    Inactive,
}

/// Membership of a team member within a project
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub project_id: Uuid,
    pub team_member_id: Uuid,
    pub status: ContributorStatus,
    pub joined_at: DateTime<Utc>,
}
