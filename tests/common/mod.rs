//! Shared helpers for in-process router tests.
//!
//! These tests drive the router directly with `tower::ServiceExt::oneshot`,
//! so no server or database is needed; they cover the paths that reject a
//! request before any query runs.

use axum::body::Body;
use axum::http::{header, Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use uuid::Uuid;

use projectify_api::auth::{generate_jwt, Claims};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Build the app with a deterministic JWT secret
pub fn app() -> axum::Router {
    std::env::set_var("JWT_SECRET", TEST_JWT_SECRET);
    projectify_api::app()
}

pub fn admin_token() -> String {
    std::env::set_var("JWT_SECRET", TEST_JWT_SECRET);
    generate_jwt(&Claims::admin(Uuid::new_v4())).unwrap()
}

pub fn team_member_token() -> String {
    std::env::set_var("JWT_SECRET", TEST_JWT_SECRET);
    generate_jwt(&Claims::team_member(Uuid::new_v4(), Uuid::new_v4())).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_auth(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_request_with_auth(method: &str, uri: &str, auth: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
