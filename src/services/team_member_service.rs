use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{self, password, token, Claims};
use crate::database::models::{TeamMember, TeamMemberAccountStatus};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::mailer::Mailer;

#[derive(Debug)]
pub struct CreateTeamMemberData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    pub join_date: NaiveDate,
}

#[derive(Debug, Default)]
pub struct TeamMemberUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub join_date: Option<NaiveDate>,
}

impl TeamMemberUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.position.is_none()
            && self.join_date.is_none()
    }
}

pub struct TeamMemberService {
    pool: PgPool,
}

impl TeamMemberService {
    pub async fn new() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Invite a team member: INACTIVE row plus a create-password mail.
    /// Duplicate emails surface as 409.
    pub async fn create(
        &self,
        admin_id: Uuid,
        data: CreateTeamMemberData,
    ) -> Result<TeamMember, ApiError> {
        let invite_token = token::generate();

        let team_member = sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO team_members
                (admin_id, first_name, last_name, email, position, join_date, invite_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(admin_id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.position)
        .bind(data.join_date)
        .bind(token::hash(&invite_token))
        .fetch_one(&self.pool)
        .await?;

        Mailer::instance()?
            .send_create_password_invite(&data.email, &invite_token)
            .await?;

        Ok(team_member)
    }

    /// Redeem an invite token: set the password and activate the account
    pub async fn create_password(
        &self,
        invite_token: &str,
        password_input: &str,
        email: &str,
    ) -> Result<(), ApiError> {
        let team_member =
            sqlx::query_as::<_, TeamMember>("SELECT * FROM team_members WHERE invite_token = $1")
                .bind(token::hash(invite_token))
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| ApiError::not_found("Team member not found: Invalid Token"))?;

        // The invite was mailed to exactly one address; the redeeming request
        // must present the same one.
        if !team_member.email.eq_ignore_ascii_case(email) {
            return Err(ApiError::bad_request("Email does not match the invitation"));
        }

        let hashed_password = password::hash(password_input).await?;

        sqlx::query(
            r#"
            UPDATE team_members
            SET password = $2, status = 'ACTIVE', invite_token = NULL, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(team_member.id)
        .bind(&hashed_password)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Validate credentials and issue a team-member JWT carrying the owning
    /// admin id. INACTIVE members get a fresh invite instead of a token;
    /// DEACTIVATED members are locked out.
    pub async fn login(&self, email: &str, password_input: &str) -> Result<String, ApiError> {
        let team_member =
            sqlx::query_as::<_, TeamMember>("SELECT * FROM team_members WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| ApiError::not_found("Team member does not exist"))?;

        match team_member.status {
            TeamMemberAccountStatus::Inactive => {
                let invite_token = token::generate();

                sqlx::query(
                    "UPDATE team_members SET invite_token = $2, updated_at = now() WHERE id = $1",
                )
                .bind(team_member.id)
                .bind(token::hash(&invite_token))
                .execute(&self.pool)
                .await?;

                Mailer::instance()?
                    .send_create_password_invite(&team_member.email, &invite_token)
                    .await?;

                return Err(ApiError::bad_request(
                    "You did not set up the account password yet. We just emailed an instruction.",
                ));
            }
            TeamMemberAccountStatus::Deactivated => {
                return Err(ApiError::unauthorized(
                    "Oops. You do not have an access to the platform anymore!",
                ));
            }
            TeamMemberAccountStatus::Active => {}
        }

        let password_matches = match &team_member.password {
            Some(hashed) => password::verify(password_input, hashed).await?,
            None => false,
        };

        if !password_matches {
            return Err(ApiError::unauthorized("Invalid Credentials"));
        }

        let jwt = auth::generate_jwt(&Claims::team_member(team_member.id, team_member.admin_id))?;
        Ok(jwt)
    }

    pub async fn get_me(&self, id: Uuid) -> Result<TeamMember, ApiError> {
        sqlx::query_as::<_, TeamMember>("SELECT * FROM team_members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Team member does not exist"))
    }

    pub async fn get_all(&self, admin_id: Uuid) -> Result<Vec<TeamMember>, ApiError> {
        let team_members = sqlx::query_as::<_, TeamMember>(
            "SELECT * FROM team_members WHERE admin_id = $1 ORDER BY created_at",
        )
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(team_members)
    }

    /// Flip a member between ACTIVE and DEACTIVATED. INACTIVE members have
    /// never finished onboarding; they can only be deleted.
    pub async fn change_status(
        &self,
        admin_id: Uuid,
        team_member_id: Uuid,
        status: TeamMemberAccountStatus,
    ) -> Result<(), ApiError> {
        let team_member = self.ensure_belongs_to_admin(team_member_id, admin_id).await?;

        if team_member.status == TeamMemberAccountStatus::Inactive {
            return Err(ApiError::forbidden(
                "Status Change is not allowed. Users with INACTIVE status can be deleted only!",
            ));
        }

        sqlx::query(
            "UPDATE team_members SET status = $3, updated_at = now() WHERE id = $1 AND admin_id = $2",
        )
        .bind(team_member_id)
        .bind(admin_id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(
        &self,
        admin_id: Uuid,
        team_member_id: Uuid,
        update: TeamMemberUpdate,
    ) -> Result<(), ApiError> {
        self.ensure_belongs_to_admin(team_member_id, admin_id).await?;

        sqlx::query(
            r#"
            UPDATE team_members
            SET first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                position = COALESCE($5, position),
                join_date = COALESCE($6, join_date),
                updated_at = now()
            WHERE id = $1 AND admin_id = $2
            "#,
        )
        .bind(team_member_id)
        .bind(admin_id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.position)
        .bind(update.join_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete an invited member who never activated
    pub async fn delete(&self, admin_id: Uuid, team_member_id: Uuid) -> Result<(), ApiError> {
        let team_member = self.ensure_belongs_to_admin(team_member_id, admin_id).await?;

        if team_member.status != TeamMemberAccountStatus::Inactive {
            return Err(ApiError::bad_request(
                "Only users with INACTIVE status can be deleted!",
            ));
        }

        sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(team_member_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Ownership check shared with the project service
    pub async fn ensure_belongs_to_admin(
        &self,
        team_member_id: Uuid,
        admin_id: Uuid,
    ) -> Result<TeamMember, ApiError> {
        let team_member =
            sqlx::query_as::<_, TeamMember>("SELECT * FROM team_members WHERE id = $1")
                .bind(team_member_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| ApiError::not_found("Team member does not exist"))?;

        if team_member.admin_id != admin_id {
            return Err(ApiError::not_yours());
        }

        Ok(team_member)
    }
}
