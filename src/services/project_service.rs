use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::models::{
    Contributor, ContributorStatus, Project, ProjectStatus, ProjectWithContributorCount,
};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::services::team_member_service::TeamMemberService;

#[derive(Debug)]
pub struct CreateProjectData {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Contributor row joined with team-member details
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssignedContributor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub status: ContributorStatus,
    pub joined_at: DateTime<Utc>,
}

/// Team member of the admin who is not on the project yet
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberBrief {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorsOverview {
    pub assigned_contributors: Vec<AssignedContributor>,
    pub not_assigned_contributors: Vec<TeamMemberBrief>,
}

pub struct ProjectService {
    pool: PgPool,
}

impl ProjectService {
    pub async fn new() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn create(
        &self,
        admin_id: Uuid,
        data: CreateProjectData,
    ) -> Result<Project, ApiError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (admin_id, name, description, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(admin_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn get_one(&self, id: Uuid, admin_id: Uuid) -> Result<Project, ApiError> {
        self.ensure_belongs_to_admin(id, admin_id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        admin_id: Uuid,
        update: ProjectUpdate,
    ) -> Result<(), ApiError> {
        self.ensure_belongs_to_admin(id, admin_id).await?;

        sqlx::query(
            r#"
            UPDATE projects
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                updated_at = now()
            WHERE id = $1 AND admin_id = $2
            "#,
        )
        .bind(id)
        .bind(admin_id)
        .bind(update.name)
        .bind(update.description)
        .bind(update.start_date)
        .bind(update.end_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All projects of the admin, each with its ACTIVE contributor count.
    /// One grouped query instead of the original's per-project lookups.
    pub async fn get_all(
        &self,
        admin_id: Uuid,
    ) -> Result<Vec<ProjectWithContributorCount>, ApiError> {
        let projects = sqlx::query_as::<_, ProjectWithContributorCount>(
            r#"
            SELECT p.*,
                   COUNT(c.team_member_id) FILTER (WHERE c.status = 'ACTIVE')
                       AS number_of_contributors
            FROM projects p
            LEFT JOIN contributors c ON c.project_id = p.id
            WHERE p.admin_id = $1
            GROUP BY p.id
            ORDER BY p.created_at
            "#,
        )
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    pub async fn change_status(
        &self,
        id: Uuid,
        admin_id: Uuid,
        status: ProjectStatus,
    ) -> Result<(), ApiError> {
        self.ensure_belongs_to_admin(id, admin_id).await?;

        sqlx::query(
            "UPDATE projects SET status = $3, updated_at = now() WHERE id = $1 AND admin_id = $2",
        )
        .bind(id)
        .bind(admin_id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Both the project and the team member must belong to the requesting
    /// admin; the (project, member) pair is unique, so re-adding yields 409.
    pub async fn add_contributor(
        &self,
        project_id: Uuid,
        team_member_id: Uuid,
        admin_id: Uuid,
    ) -> Result<Contributor, ApiError> {
        self.ensure_belongs_to_admin(project_id, admin_id).await?;
        TeamMemberService::new()
            .await?
            .ensure_belongs_to_admin(team_member_id, admin_id)
            .await?;

        let contributor = sqlx::query_as::<_, Contributor>(
            r#"
            INSERT INTO contributors (project_id, team_member_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(team_member_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(contributor)
    }

    pub async fn change_contributor_status(
        &self,
        project_id: Uuid,
        team_member_id: Uuid,
        admin_id: Uuid,
        status: ContributorStatus,
    ) -> Result<(), ApiError> {
        self.ensure_belongs_to_admin(project_id, admin_id).await?;
        TeamMemberService::new()
            .await?
            .ensure_belongs_to_admin(team_member_id, admin_id)
            .await?;

        sqlx::query(
            r#"
            UPDATE contributors
            SET status = $3
            WHERE project_id = $1 AND team_member_id = $2
            "#,
        )
        .bind(project_id)
        .bind(team_member_id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Assigned contributors with member details, plus the admin's remaining
    /// team members who are not on the project
    pub async fn get_contributors(
        &self,
        project_id: Uuid,
        admin_id: Uuid,
    ) -> Result<ContributorsOverview, ApiError> {
        self.ensure_belongs_to_admin(project_id, admin_id).await?;

        let assigned = sqlx::query_as::<_, AssignedContributor>(
            r#"
            SELECT tm.id, tm.first_name, tm.last_name, tm.position,
                   c.status, c.joined_at
            FROM contributors c
            JOIN team_members tm ON tm.id = c.team_member_id
            WHERE c.project_id = $1
            ORDER BY c.joined_at
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let not_assigned = sqlx::query_as::<_, TeamMemberBrief>(
            r#"
            SELECT tm.id, tm.first_name, tm.last_name, tm.position
            FROM team_members tm
            WHERE tm.admin_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM contributors c
                  WHERE c.project_id = $2 AND c.team_member_id = tm.id
              )
            ORDER BY tm.created_at
            "#,
        )
        .bind(admin_id)
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ContributorsOverview {
            assigned_contributors: assigned,
            not_assigned_contributors: not_assigned,
        })
    }

    /// Ownership check shared with the story service
    pub async fn ensure_belongs_to_admin(
        &self,
        project_id: Uuid,
        admin_id: Uuid,
    ) -> Result<Project, ApiError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Project does not exist"))?;

        if project.admin_id != admin_id {
            return Err(ApiError::not_yours());
        }

        Ok(project)
    }
}
