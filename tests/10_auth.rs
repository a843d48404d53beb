mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn banner_is_public() {
    let response = common::app().oneshot(common::get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Projectify API");
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    for uri in ["/admins/me", "/team-members/me", "/projects"] {
        let response = common::app().oneshot(common::get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {uri}");

        let body = common::body_json(response).await;
        assert_eq!(body["message"], "You are not logged in. Please, log in");
    }
}

#[tokio::test]
async fn malformed_bearer_is_rejected() {
    let response = common::app()
        .oneshot(common::get_with_auth("/admins/me", "Basic abc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Not Valid Token");
}

#[tokio::test]
async fn tampered_jwt_is_rejected() {
    let mut token = common::admin_token();
    token.push('x');

    let response = common::app()
        .oneshot(common::get_with_auth(
            "/admins/me",
            &format!("Bearer {token}"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn team_member_cannot_reach_admin_routes() {
    let token = common::team_member_token();

    for uri in ["/admins/me", "/projects", "/team-members"] {
        let response = common::app()
            .oneshot(common::get_with_auth(uri, &format!("Bearer {token}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN, "uri: {uri}");
        let body = common::body_json(response).await;
        assert_eq!(
            body["message"],
            "Forbidden: You are not authorized to perform this action"
        );
    }
}

#[tokio::test]
async fn admin_cannot_use_team_member_profile_route() {
    let token = common::admin_token();

    let response = common::app()
        .oneshot(common::get_with_auth(
            "/team-members/me",
            &format!("Bearer {token}"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invite_redemption_requires_token_header() {
    let response = common::app()
        .oneshot(common::json_request(
            "PATCH",
            "/team-members/create-password",
            json!({ "email": "a@b.c", "password": "pw", "passwordConfirm": "pw" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Invite Token is missing");
}

#[tokio::test]
async fn invite_redemption_rejects_malformed_token_header() {
    let response = common::app()
        .oneshot(common::json_request_with_auth(
            "PATCH",
            "/team-members/create-password",
            "Basic abc",
            json!({ "email": "a@b.c", "password": "pw", "passwordConfirm": "pw" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Token was not sent in correct form");
}
