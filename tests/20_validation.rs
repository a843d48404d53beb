mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn sign_up_requires_all_fields() {
    let response = common::app()
        .oneshot(common::json_request(
            "POST",
            "/admins/sign-up",
            json!({ "email": "ada@example.com", "firstName": "Ada" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(
        body["message"],
        "All fields are required: Email, First name, Last name, Password"
    );
}

#[tokio::test]
async fn activation_requires_token_query_param() {
    let response = common::app()
        .oneshot(common::get("/admins/activate-account"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Activation Token is missing");
}

#[tokio::test]
async fn reset_password_requires_token_header() {
    let response = common::app()
        .oneshot(common::json_request(
            "PATCH",
            "/admins/reset-password",
            json!({ "password": "pw", "passwordConfirm": "pw" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Password Reset Token is missing");
}

#[tokio::test]
async fn team_member_login_requires_credentials() {
    let response = common::app()
        .oneshot(common::json_request(
            "POST",
            "/team-members/login",
            json!({ "email": "ada@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "All fields required: email and password");
}

#[tokio::test]
async fn create_password_rejects_mismatched_confirmation() {
    let response = common::app()
        .oneshot(common::json_request_with_auth(
            "PATCH",
            "/team-members/create-password",
            "Bearer some-invite-token",
            json!({ "email": "a@b.c", "password": "pw1", "passwordConfirm": "pw2" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(
        body["message"],
        "Password and Password Confirmation must match"
    );
}

#[tokio::test]
async fn project_creation_validates_date_order() {
    let token = common::admin_token();

    let response = common::app()
        .oneshot(common::json_request_with_auth(
            "POST",
            "/projects",
            &format!("Bearer {token}"),
            json!({
                "name": "Apollo",
                "description": "Launch prep",
                "startDate": "2026-09-01",
                "endDate": "2026-08-01"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Start Date cannot be greater than End Date");
}

#[tokio::test]
async fn project_update_requires_both_dates_together() {
    let token = common::admin_token();

    let response = common::app()
        .oneshot(common::json_request_with_auth(
            "PATCH",
            "/projects/5f3a2f3e-1111-2222-3333-444455556666",
            &format!("Bearer {token}"),
            json!({ "startDate": "2026-09-01" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Both Start date and End date is required");
}

#[tokio::test]
async fn empty_story_update_is_rejected() {
    let token = common::admin_token();

    let response = common::app()
        .oneshot(common::json_request_with_auth(
            "PATCH",
            "/stories/5f3a2f3e-1111-2222-3333-444455556666",
            &format!("Bearer {token}"),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "No update data provided");
}

#[tokio::test]
async fn story_creation_requires_title_and_project() {
    let token = common::admin_token();

    let response = common::app()
        .oneshot(common::json_request_with_auth(
            "POST",
            "/stories",
            &format!("Bearer {token}"),
            json!({ "description": "no title" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Both Title and Project Id are required");
}

#[tokio::test]
async fn task_creation_requires_title_and_due_date() {
    let token = common::admin_token();

    let response = common::app()
        .oneshot(common::json_request_with_auth(
            "PATCH",
            "/admins/me/tasks",
            &format!("Bearer {token}"),
            json!({ "description": "no title or due" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Both Title and Due Date are required");
}
