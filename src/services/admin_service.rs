use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{self, password, token, Claims, Role};
use crate::config;
use crate::database::models::{Admin, AdminAccountStatus, Task, TaskStatus};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::mailer::Mailer;

/// Validated sign-up payload, shaped by the handler
#[derive(Debug)]
pub struct SignUpData {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub preferred_first_name: Option<String>,
    pub company_name: Option<String>,
    pub company_position: Option<String>,
    pub password: String,
}

#[derive(Debug)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due.is_none()
            && self.status.is_none()
    }
}

/// Profile subset returned by GET /admins/me, in the frontend's wire shape:
/// company is a nested object (null unless both fields are set) and the role
/// is spelled out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub preferred_first_name: Option<String>,
    pub role: Role,
    pub company: Option<CompanyProfile>,
}

#[derive(Debug, Serialize)]
pub struct CompanyProfile {
    pub name: String,
    pub position: String,
}

impl From<Admin> for AdminProfile {
    fn from(admin: Admin) -> Self {
        let company = match (admin.company_name, admin.company_position) {
            (Some(name), Some(position)) => Some(CompanyProfile { name, position }),
            _ => None,
        };

        Self {
            id: admin.id,
            email: admin.email,
            first_name: admin.first_name,
            last_name: admin.last_name,
            preferred_first_name: admin.preferred_first_name,
            role: Role::Admin,
            company,
        }
    }
}

pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub async fn new() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Create an INACTIVE account and mail the activation link. Duplicate
    /// emails surface as 409 through the sqlx error mapping.
    pub async fn sign_up(&self, input: SignUpData) -> Result<(), ApiError> {
        let hashed_password = password::hash(&input.password).await?;
        let activation_token = token::generate();
        let email = input.email.to_lowercase();

        sqlx::query(
            r#"
            INSERT INTO admins
                (email, first_name, last_name, preferred_first_name,
                 company_name, company_position, password, activation_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.preferred_first_name)
        .bind(&input.company_name)
        .bind(&input.company_position)
        .bind(&hashed_password)
        .bind(token::hash(&activation_token))
        .execute(&self.pool)
        .await?;

        Mailer::instance()?
            .send_activation_mail(&email, &activation_token)
            .await?;

        Ok(())
    }

    /// Validate credentials and issue an admin JWT. An INACTIVE account gets
    /// a fresh activation mail instead of a token.
    pub async fn login(&self, email: &str, password_input: &str) -> Result<String, ApiError> {
        let admin = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::not_found("Admin does not exist"))?;

        if admin.status == AdminAccountStatus::Inactive {
            let activation_token = token::generate();

            sqlx::query("UPDATE admins SET activation_token = $2, updated_at = now() WHERE id = $1")
                .bind(admin.id)
                .bind(token::hash(&activation_token))
                .execute(&self.pool)
                .await?;

            Mailer::instance()?
                .send_activation_mail(&admin.email, &activation_token)
                .await?;

            return Err(ApiError::bad_request(
                "We just sent you activation email. Follow instructions",
            ));
        }

        if !password::verify(password_input, &admin.password).await? {
            return Err(ApiError::unauthorized("Invalid Credentials"));
        }

        let jwt = auth::generate_jwt(&Claims::admin(admin.id))?;
        Ok(jwt)
    }

    /// Redeem a single-use activation token
    pub async fn activate(&self, activation_token: &str) -> Result<(), ApiError> {
        let admin_id: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM admins WHERE activation_token = $1")
                .bind(token::hash(activation_token))
                .fetch_optional(&self.pool)
                .await?;

        let admin_id = admin_id.ok_or_else(|| {
            ApiError::not_found("Admin does not exist with provided Activation Token")
        })?;

        sqlx::query(
            r#"
            UPDATE admins
            SET status = 'ACTIVE', activation_token = NULL, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(admin_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a hashed reset token with a short expiry and mail the plaintext
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let admin = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::not_found("Admin does not exist with provided email"))?;

        let reset_token = token::generate();
        let ttl = Duration::minutes(config::config().security.reset_token_ttl_minutes);
        let expires_at = Utc::now() + ttl;

        sqlx::query(
            r#"
            UPDATE admins
            SET password_reset_token = $2,
                password_reset_token_expiration_date = $3,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(admin.id)
        .bind(token::hash(&reset_token))
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Mailer::instance()?
            .send_password_reset_token(&admin.email, &reset_token, Role::Admin)
            .await?;

        Ok(())
    }

    /// Redeem a reset token: expired or unknown tokens never touch the password
    pub async fn reset_password(
        &self,
        password_input: &str,
        password_confirm: &str,
        reset_token: &str,
    ) -> Result<(), ApiError> {
        if password_input != password_confirm {
            return Err(ApiError::bad_request(
                "Password and Password Confirmation does not match",
            ));
        }

        let admin = sqlx::query_as::<_, Admin>(
            "SELECT * FROM admins WHERE password_reset_token = $1",
        )
        .bind(token::hash(reset_token))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            ApiError::not_found("Admin does not exist with provided Password Reset Token")
        })?;

        let expires_at = admin.password_reset_token_expiration_date.ok_or_else(|| {
            ApiError::internal_server_error(
                "Password reset token expiration date is missing. Cannot update the password",
            )
        })?;

        if expires_at < Utc::now() {
            return Err(ApiError::bad_request(
                "Password Reset Token Expired: Request a new one",
            ));
        }

        let hashed_password = password::hash(password_input).await?;

        sqlx::query(
            r#"
            UPDATE admins
            SET password = $2,
                password_reset_token = NULL,
                password_reset_token_expiration_date = NULL,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(admin.id)
        .bind(&hashed_password)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_me(&self, admin_id: Uuid) -> Result<AdminProfile, ApiError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Admin does not exist"))?;

        Ok(AdminProfile::from(admin))
    }

    pub async fn create_task(&self, admin_id: Uuid, input: NewTask) -> Result<Task, ApiError> {
        let mut tasks = self.load_tasks(admin_id).await?;

        let task = Task {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            due: input.due,
            status: TaskStatus::Todo,
        };
        tasks.push(task.clone());

        self.store_tasks(admin_id, &tasks).await?;
        Ok(task)
    }

    pub async fn get_tasks(&self, admin_id: Uuid) -> Result<Vec<Task>, ApiError> {
        self.load_tasks(admin_id).await
    }

    pub async fn delete_task(&self, admin_id: Uuid, task_id: Uuid) -> Result<(), ApiError> {
        let tasks = self.load_tasks(admin_id).await?;

        let remaining: Vec<Task> = tasks.iter().filter(|t| t.id != task_id).cloned().collect();
        if remaining.len() == tasks.len() {
            return Err(ApiError::not_found("Task does not exist"));
        }

        self.store_tasks(admin_id, &remaining).await
    }

    pub async fn update_task(
        &self,
        admin_id: Uuid,
        task_id: Uuid,
        update: TaskUpdate,
    ) -> Result<(), ApiError> {
        let mut tasks = self.load_tasks(admin_id).await?;

        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ApiError::not_found("Task does not exist"))?;

        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = Some(description);
        }
        if let Some(due) = update.due {
            task.due = due;
        }
        if let Some(status) = update.status {
            task.status = status;
        }

        self.store_tasks(admin_id, &tasks).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn load_tasks(&self, admin_id: Uuid) -> Result<Vec<Task>, ApiError> {
        let tasks: Option<Json<Vec<Task>>> =
            sqlx::query_scalar("SELECT tasks FROM admins WHERE id = $1")
                .bind(admin_id)
                .fetch_optional(&self.pool)
                .await?;

        tasks
            .map(|t| t.0)
            .ok_or_else(|| ApiError::not_found("Admin does not exist"))
    }

    async fn store_tasks(&self, admin_id: Uuid, tasks: &[Task]) -> Result<(), ApiError> {
        sqlx::query("UPDATE admins SET tasks = $2, updated_at = now() WHERE id = $1")
            .bind(admin_id)
            .bind(Json(tasks))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
