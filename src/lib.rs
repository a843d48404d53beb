pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod middleware;
pub mod services;

use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Json};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{jwt_auth_middleware, require_admin, require_team_member};

/// Build the full application router. Kept separate from `main` so tests can
/// drive the router in-process.
pub fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/admins", admin_routes())
        .nest("/team-members", team_member_routes())
        .nest("/projects", project_routes())
        .nest("/stories", story_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn admin_routes() -> Router {
    use handlers::admins;

    let guarded = Router::new()
        .route("/me", get(admins::me))
        .route("/me/tasks", get(admins::get_tasks).patch(admins::create_task))
        .route("/me/tasks/:task_id", patch(admins::update_task))
        .route("/me/tasks/:task_id/delete", patch(admins::delete_task))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn(jwt_auth_middleware));

    Router::new()
        .route("/sign-up", post(admins::sign_up))
        .route("/login", post(admins::login))
        .route("/activate-account", get(admins::activate))
        .route("/forgot-password", patch(admins::forgot_password))
        .route("/reset-password", patch(admins::reset_password))
        .merge(guarded)
}

fn team_member_routes() -> Router {
    use handlers::team_members;

    let me = Router::new()
        .route("/me", get(team_members::me))
        .route_layer(from_fn(require_team_member))
        .route_layer(from_fn(jwt_auth_middleware));

    let admin_only = Router::new()
        .route("/", post(team_members::create).get(team_members::get_all))
        .route(
            "/:team_member_id/deactivate",
            patch(team_members::deactivate),
        )
        .route(
            "/:team_member_id/reactivate",
            patch(team_members::reactivate),
        )
        .route("/:team_member_id/update", patch(team_members::update))
        .route("/:team_member_id/delete", delete(team_members::delete))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn(jwt_auth_middleware));

    Router::new()
        .route("/create-password", patch(team_members::create_password))
        .route("/login", post(team_members::login))
        .merge(me)
        .merge(admin_only)
}

fn project_routes() -> Router {
    use handlers::projects;

    Router::new()
        .route("/", post(projects::create).get(projects::get_all))
        .route("/:project_id", get(projects::get_one).patch(projects::update))
        .route("/:project_id/change-status", patch(projects::change_status))
        .route("/:project_id/contributors", get(projects::get_contributors))
        .route(
            "/:project_id/contributors/add",
            post(projects::add_contributor),
        )
        .route(
            "/:project_id/contributors/:team_member_id/change-status",
            patch(projects::change_contributor_status),
        )
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn story_routes() -> Router {
    use handlers::stories;

    // Story mutations and sub-task creation are admin-only; reads and
    // sub-task updates are also open to the story's assignee, which the
    // service resolves per story.
    let admin_only = Router::new()
        .route("/", post(stories::create))
        .route("/:story_id", patch(stories::update))
        .route("/:story_id/archive", patch(stories::archive))
        .route("/:story_id/subTasks", patch(stories::create_sub_task))
        .route_layer(from_fn(require_admin));

    admin_only
        .route("/:story_id", get(stories::get_one))
        .route("/:story_id/subTasks", get(stories::get_sub_tasks))
        .route(
            "/:story_id/subTasks/:sub_task_id",
            get(stories::get_sub_task)
                .patch(stories::update_sub_task)
                .delete(stories::delete_sub_task),
        )
        .route_layer(from_fn(jwt_auth_middleware))
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Projectify API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "admins": "/admins/* (sign-up, login, activation, password reset, tasks)",
                "teamMembers": "/team-members/* (invites, login, administration)",
                "projects": "/projects/* (admin only)",
                "stories": "/stories/* (admin or assignee)",
            }
        }
    }))
}

async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "message": "database unavailable",
                "data": { "status": "degraded", "timestamp": now, "databaseError": e.to_string() }
            })),
        ),
    }
}
