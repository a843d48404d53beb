use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "admin_account_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminAccountStatus {
    Inactive,
    Active,
}

/// Tenant owner account. Secrets and token material never serialize.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub preferred_first_name: Option<String>,
    pub company_name: Option<String>,
    pub company_position: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
    pub status: AdminAccountStatus,
    #[serde(skip_serializing)]
    pub activation_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_token_expiration_date: Option<DateTime<Utc>>,
    pub tasks: Json<Vec<Task>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
