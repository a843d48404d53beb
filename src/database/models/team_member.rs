use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(
    type_name = "team_member_account_status",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamMemberAccountStatus {
    /// Invited, password not yet created
    Inactive,
    Active,
    /// Access revoked by the owning admin
    Deactivated,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    pub join_date: NaiveDate,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub status: TeamMemberAccountStatus,
    #[serde(skip_serializing)]
    pub invite_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
