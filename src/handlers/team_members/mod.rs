//! Team-member onboarding, login and administration.
//!
//! Creation, status changes, updates and deletion are admin-only; the
//! invited member only ever redeems the invite and logs in.

use axum::extract::Path;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{TeamMember, TeamMemberAccountStatus};
use crate::error::ApiError;
use crate::middleware::{extract_token_or, ApiResponse, ApiResult, CurrentUser};
use crate::services::team_member_service::{
    CreateTeamMemberData, TeamMemberService, TeamMemberUpdate,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamMemberRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub join_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePasswordRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamMemberRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub join_date: Option<NaiveDate>,
}

/// POST /team-members - invite a team member (admin only)
pub async fn create(
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateTeamMemberRequest>,
) -> ApiResult<TeamMember> {
    let (first_name, last_name, email, position, join_date) = match (
        payload.first_name,
        payload.last_name,
        payload.email,
        payload.position,
        payload.join_date,
    ) {
        (Some(first_name), Some(last_name), Some(email), Some(position), Some(join_date)) => {
            (first_name, last_name, email, position, join_date)
        }
        _ => {
            return Err(ApiError::bad_request(
                "All fields are required: First name, Last Name, Email, Position",
            ))
        }
    };

    let data = CreateTeamMemberData {
        first_name,
        last_name,
        email: email.to_lowercase(),
        position,
        join_date,
    };

    let team_member = TeamMemberService::new().await?.create(user.id, data).await?;

    Ok(ApiResponse::created(team_member))
}

/// PATCH /team-members/create-password
///
/// The invite token travels as a bearer token, mirroring the mailed link.
pub async fn create_password(
    headers: HeaderMap,
    Json(payload): Json<CreatePasswordRequest>,
) -> ApiResult {
    let invite_token = extract_token_or(
        &headers,
        ApiError::unauthorized("Invite Token is missing"),
        ApiError::bad_request("Token was not sent in correct form"),
    )?;

    let (email, password, password_confirm) = match (
        payload.email,
        payload.password,
        payload.password_confirm,
    ) {
        (Some(email), Some(password), Some(password_confirm)) => {
            (email, password, password_confirm)
        }
        _ => {
            return Err(ApiError::bad_request(
                "All fields are required: Password, Password Confirmation, Email",
            ))
        }
    };

    if password != password_confirm {
        return Err(ApiError::bad_request(
            "Password and Password Confirmation must match",
        ));
    }

    TeamMemberService::new()
        .await?
        .create_password(&invite_token, &password, &email)
        .await?;

    Ok(ApiResponse::message(
        "You successfully created a password. Now, you can log in",
    ))
}

/// POST /team-members/login
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(ApiError::bad_request("All fields required: email and password")),
    };

    let token = TeamMemberService::new().await?.login(&email, &password).await?;

    Ok(Json(json!({ "token": token })))
}

/// GET /team-members/me
pub async fn me(Extension(user): Extension<CurrentUser>) -> ApiResult<TeamMember> {
    let team_member = TeamMemberService::new().await?.get_me(user.id).await?;
    Ok(ApiResponse::data(team_member))
}

/// GET /team-members - everyone the admin has invited
pub async fn get_all(Extension(user): Extension<CurrentUser>) -> ApiResult<Vec<TeamMember>> {
    let team_members = TeamMemberService::new().await?.get_all(user.id).await?;
    Ok(ApiResponse::data(team_members))
}

/// PATCH /team-members/:teamMemberId/deactivate
pub async fn deactivate(
    Extension(user): Extension<CurrentUser>,
    Path(team_member_id): Path<Uuid>,
) -> ApiResult {
    TeamMemberService::new()
        .await?
        .change_status(user.id, team_member_id, TeamMemberAccountStatus::Deactivated)
        .await?;

    Ok(ApiResponse::no_content())
}

/// PATCH /team-members/:teamMemberId/reactivate
pub async fn reactivate(
    Extension(user): Extension<CurrentUser>,
    Path(team_member_id): Path<Uuid>,
) -> ApiResult {
    TeamMemberService::new()
        .await?
        .change_status(user.id, team_member_id, TeamMemberAccountStatus::Active)
        .await?;

    Ok(ApiResponse::no_content())
}

/// PATCH /team-members/:teamMemberId/update
pub async fn update(
    Extension(user): Extension<CurrentUser>,
    Path(team_member_id): Path<Uuid>,
    Json(payload): Json<UpdateTeamMemberRequest>,
) -> ApiResult {
    let update = TeamMemberUpdate {
        first_name: payload.first_name,
        last_name: payload.last_name,
        position: payload.position,
        join_date: payload.join_date,
    };

    if update.is_empty() {
        return Err(ApiError::bad_request("No update data provided"));
    }

    TeamMemberService::new()
        .await?
        .update(user.id, team_member_id, update)
        .await?;

    Ok(ApiResponse::no_content())
}

/// DELETE /team-members/:teamMemberId/delete
pub async fn delete(
    Extension(user): Extension<CurrentUser>,
    Path(team_member_id): Path<Uuid>,
) -> ApiResult {
    TeamMemberService::new()
        .await?
        .delete(user.id, team_member_id)
        .await?;

    Ok(ApiResponse::no_content())
}
