//! Database-backed lifecycle tests: single-use tokens, reset-token expiry
//! and ownership gating. These need a running Postgres; each test is a no-op
//! unless DATABASE_URL is set.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use projectify_api::auth::token;
use projectify_api::database::models::{ContributorStatus, ProjectStatus};
use projectify_api::database::DatabaseManager;
use projectify_api::services::project_service::ProjectUpdate;
use projectify_api::services::team_member_service::TeamMemberUpdate;
use projectify_api::services::{AdminService, ProjectService, TeamMemberService};

async fn test_pool() -> Option<PgPool> {
    std::env::var("DATABASE_URL").ok()?;
    DatabaseManager::migrate().await.expect("migrations");
    Some(DatabaseManager::pool().await.expect("pool"))
}

async fn insert_admin(pool: &PgPool) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO admins (email, first_name, last_name, password)
        VALUES ($1, 'Ada', 'Lovelace', 'not-a-real-hash')
        RETURNING id
        "#,
    )
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .expect("insert admin")
}

async fn insert_team_member(pool: &PgPool, admin_id: Uuid) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO team_members
            (admin_id, first_name, last_name, email, position, join_date, status)
        VALUES ($1, 'Grace', 'Hopper', $2, 'Engineer', $3, 'ACTIVE')
        RETURNING id
        "#,
    )
    .bind(admin_id)
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    .fetch_one(pool)
    .await
    .expect("insert team member")
}

async fn insert_project(pool: &PgPool, admin_id: Uuid) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO projects (admin_id, name, description, start_date, end_date)
        VALUES ($1, 'Apollo', 'Launch prep', $2, $3)
        RETURNING id
        "#,
    )
    .bind(admin_id)
    .bind(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    .bind(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())
    .fetch_one(pool)
    .await
    .expect("insert project")
}

#[tokio::test]
async fn activation_token_is_single_use() {
    let Some(pool) = test_pool().await else { return };

    let plain = token::generate();
    let admin_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO admins (email, first_name, last_name, password, activation_token)
        VALUES ($1, 'Ada', 'Lovelace', 'not-a-real-hash', $2)
        RETURNING id
        "#,
    )
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind(token::hash(&plain))
    .fetch_one(&pool)
    .await
    .unwrap();

    let service = AdminService::new().await.unwrap();
    service.activate(&plain).await.unwrap();

    let status: String = sqlx::query_scalar("SELECT status::text FROM admins WHERE id = $1")
        .bind(admin_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "ACTIVE");

    // Second redemption must fail: the stored hash was cleared
    let err = service.activate(&plain).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn expired_reset_token_is_rejected() {
    let Some(pool) = test_pool().await else { return };

    let plain = token::generate();
    let admin_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO admins
            (email, first_name, last_name, password,
             password_reset_token, password_reset_token_expiration_date)
        VALUES ($1, 'Ada', 'Lovelace', 'not-a-real-hash', $2, $3)
        RETURNING id
        "#,
    )
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind(token::hash(&plain))
    .bind(Utc::now() - Duration::minutes(1))
    .fetch_one(&pool)
    .await
    .unwrap();

    let service = AdminService::new().await.unwrap();
    let err = service
        .reset_password("new-password", "new-password", &plain)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(err.message(), "Password Reset Token Expired: Request a new one");

    let password: String = sqlx::query_scalar("SELECT password FROM admins WHERE id = $1")
        .bind(admin_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(password, "not-a-real-hash");
}

#[tokio::test]
async fn reset_token_is_single_use() {
    let Some(pool) = test_pool().await else { return };

    let plain = token::generate();
    let admin_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO admins
            (email, first_name, last_name, password,
             password_reset_token, password_reset_token_expiration_date)
        VALUES ($1, 'Ada', 'Lovelace', 'not-a-real-hash', $2, $3)
        RETURNING id
        "#,
    )
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind(token::hash(&plain))
    .bind(Utc::now() + Duration::minutes(10))
    .fetch_one(&pool)
    .await
    .unwrap();

    let service = AdminService::new().await.unwrap();
    service
        .reset_password("new-password", "new-password", &plain)
        .await
        .unwrap();

    let password: String = sqlx::query_scalar("SELECT password FROM admins WHERE id = $1")
        .bind(admin_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(password, "not-a-real-hash");

    let err = service
        .reset_password("other-password", "other-password", &plain)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn project_mutations_are_owner_only() {
    let Some(pool) = test_pool().await else { return };

    let owner = insert_admin(&pool).await;
    let other = insert_admin(&pool).await;
    let project_id = insert_project(&pool, owner).await;

    let service = ProjectService::new().await.unwrap();

    let err = service.get_one(project_id, other).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    let update = ProjectUpdate {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let err = service.update(project_id, other, update).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    let err = service
        .change_status(project_id, other, ProjectStatus::Archived)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    // The owner goes through
    service.get_one(project_id, owner).await.unwrap();
    service
        .change_status(project_id, owner, ProjectStatus::Archived)
        .await
        .unwrap();
}

#[tokio::test]
async fn team_member_mutations_are_owner_only() {
    let Some(pool) = test_pool().await else { return };

    let owner = insert_admin(&pool).await;
    let other = insert_admin(&pool).await;
    let team_member_id = insert_team_member(&pool, owner).await;

    let service = TeamMemberService::new().await.unwrap();

    let update = TeamMemberUpdate {
        position: Some("Lead Engineer".to_string()),
        ..Default::default()
    };
    let err = service
        .update(other, team_member_id, update)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let err = service.delete(other, team_member_id).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    let update = TeamMemberUpdate {
        position: Some("Lead Engineer".to_string()),
        ..Default::default()
    };
    service.update(owner, team_member_id, update).await.unwrap();
}

#[tokio::test]
async fn contributor_transitions_are_ownership_gated() {
    let Some(pool) = test_pool().await else { return };

    let owner = insert_admin(&pool).await;
    let other = insert_admin(&pool).await;
    let project_id = insert_project(&pool, owner).await;
    let own_member = insert_team_member(&pool, owner).await;
    let foreign_member = insert_team_member(&pool, other).await;

    let service = ProjectService::new().await.unwrap();

    // Someone else's team member cannot be added
    let err = service
        .add_contributor(project_id, foreign_member, owner)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    // A non-owner cannot add to the project
    let err = service
        .add_contributor(project_id, own_member, other)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let contributor = service
        .add_contributor(project_id, own_member, owner)
        .await
        .unwrap();
    assert_eq!(contributor.team_member_id, own_member);

    // The (project, member) pair is unique
    let err = service
        .add_contributor(project_id, own_member, owner)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);

    let err = service
        .change_contributor_status(project_id, own_member, other, ContributorStatus::Inactive)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    service
        .change_contributor_status(project_id, own_member, owner, ContributorStatus::Inactive)
        .await
        .unwrap();

    let status: String = sqlx::query_scalar(
        "SELECT status::text FROM contributors WHERE project_id = $1 AND team_member_id = $2",
    )
    .bind(project_id)
    .bind(own_member)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "INACTIVE");
}
