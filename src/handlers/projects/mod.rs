//! Project CRUD and contributor management, all admin-only.

use axum::extract::Path;
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{
    Contributor, ContributorStatus, Project, ProjectStatus, ProjectWithContributorCount,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::project_service::{
    ContributorsOverview, CreateProjectData, ProjectService, ProjectUpdate,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddContributorRequest {
    pub team_member_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ContributorStatusRequest {
    pub status: Option<ContributorStatus>,
}

/// POST /projects
pub async fn create(
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<Project> {
    let (name, description, start_date, end_date) = match (
        payload.name,
        payload.description,
        payload.start_date,
        payload.end_date,
    ) {
        (Some(name), Some(description), Some(start_date), Some(end_date)) => {
            (name, description, start_date, end_date)
        }
        _ => return Err(ApiError::bad_request("All Fields are required")),
    };

    if start_date >= end_date {
        return Err(ApiError::bad_request(
            "Start Date cannot be greater than End Date",
        ));
    }

    let project = ProjectService::new()
        .await?
        .create(
            user.id,
            CreateProjectData {
                name,
                description,
                start_date,
                end_date,
            },
        )
        .await?;

    Ok(ApiResponse::created(project))
}

/// GET /projects - all projects of the admin with contributor counts
pub async fn get_all(
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<ProjectWithContributorCount>> {
    let projects = ProjectService::new().await?.get_all(user.id).await?;
    Ok(ApiResponse::data(projects))
}

/// GET /projects/:projectId
pub async fn get_one(
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Project> {
    let project = ProjectService::new()
        .await?
        .get_one(project_id, user.id)
        .await?;
    Ok(ApiResponse::data(project))
}

/// PATCH /projects/:projectId
///
/// Dates can only move together so the start/end ordering stays checkable
/// without reloading the row.
pub async fn update(
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> ApiResult {
    match (payload.start_date, payload.end_date) {
        (Some(start), Some(end)) => {
            if start >= end {
                return Err(ApiError::bad_request(
                    "End date cannot be equal or less than Start date",
                ));
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ApiError::bad_request(
                "Both Start date and End date is required",
            ));
        }
        (None, None) => {}
    }

    let update = ProjectUpdate {
        name: payload.name,
        description: payload.description,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    if update.name.is_none()
        && update.description.is_none()
        && update.start_date.is_none()
        && update.end_date.is_none()
    {
        return Err(ApiError::bad_request("No update data provided"));
    }

    ProjectService::new()
        .await?
        .update(project_id, user.id, update)
        .await?;

    Ok(ApiResponse::no_content())
}

/// PATCH /projects/:projectId/change-status
pub async fn change_status(
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<ChangeStatusRequest>,
) -> ApiResult {
    let status = payload
        .status
        .ok_or_else(|| ApiError::bad_request("Status is required"))?;

    ProjectService::new()
        .await?
        .change_status(project_id, user.id, status)
        .await?;

    Ok(ApiResponse::no_content())
}

/// POST /projects/:projectId/contributors/add
pub async fn add_contributor(
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<AddContributorRequest>,
) -> ApiResult<Contributor> {
    let team_member_id = payload
        .team_member_id
        .ok_or_else(|| ApiError::bad_request("teamMemberId is required"))?;

    let contributor = ProjectService::new()
        .await?
        .add_contributor(project_id, team_member_id, user.id)
        .await?;

    Ok(ApiResponse::data(contributor))
}

/// PATCH /projects/:projectId/contributors/:teamMemberId/change-status
pub async fn change_contributor_status(
    Extension(user): Extension<CurrentUser>,
    Path((project_id, team_member_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ContributorStatusRequest>,
) -> ApiResult {
    let status = payload
        .status
        .ok_or_else(|| ApiError::bad_request("Status is required"))?;

    ProjectService::new()
        .await?
        .change_contributor_status(project_id, team_member_id, user.id, status)
        .await?;

    Ok(ApiResponse::no_content())
}

/// GET /projects/:projectId/contributors
pub async fn get_contributors(
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<ContributorsOverview> {
    let overview = ProjectService::new()
        .await?
        .get_contributors(project_id, user.id)
        .await?;
    Ok(ApiResponse::data(overview))
}
