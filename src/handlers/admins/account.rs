//! Admin account lifecycle: sign-up, activation, login, password recovery.

use axum::extract::Query;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{extract_token_or, ApiResponse, ApiResult, CurrentUser};
use crate::services::admin_service::{AdminProfile, AdminService, SignUpData};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferred_first_name: Option<String>,
    pub company: Option<CompanyInput>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompanyInput {
    pub name: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationQuery {
    pub activation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirm: String,
}

/// POST /admins/sign-up
///
/// Creates an INACTIVE admin account and mails an activation link. The
/// company is kept only when both name and position are present.
pub async fn sign_up(Json(payload): Json<SignUpRequest>) -> ApiResult {
    let (email, first_name, last_name, password) = match (
        payload.email,
        payload.first_name,
        payload.last_name,
        payload.password,
    ) {
        (Some(email), Some(first_name), Some(last_name), Some(password)) => {
            (email, first_name, last_name, password)
        }
        _ => {
            return Err(ApiError::bad_request(
                "All fields are required: Email, First name, Last name, Password",
            ))
        }
    };

    let (company_name, company_position) = match payload.company {
        Some(CompanyInput {
            name: Some(name),
            position: Some(position),
        }) => (Some(name), Some(position)),
        _ => (None, None),
    };

    let input = SignUpData {
        email,
        first_name,
        last_name,
        preferred_first_name: payload.preferred_first_name,
        company_name,
        company_position,
        password,
    };

    AdminService::new().await?.sign_up(input).await?;

    Ok(ApiResponse::created_message(
        "We have just sent you an email. Please, Activate your account.",
    ))
}

/// POST /admins/login
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let token = AdminService::new()
        .await?
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(json!({ "token": token })))
}

/// GET /admins/activate-account?activationToken=...
pub async fn activate(Query(query): Query<ActivationQuery>) -> ApiResult {
    let activation_token = query
        .activation_token
        .ok_or_else(|| ApiError::bad_request("Activation Token is missing"))?;

    AdminService::new().await?.activate(&activation_token).await?;

    Ok(ApiResponse::message("Success"))
}

/// PATCH /admins/forgot-password
pub async fn forgot_password(Json(payload): Json<ForgotPasswordRequest>) -> ApiResult {
    AdminService::new()
        .await?
        .forgot_password(&payload.email)
        .await?;

    Ok(ApiResponse::message(
        "We emailed you an instruction to reset your password.",
    ))
}

/// PATCH /admins/reset-password
///
/// The reset token travels as a bearer token, mirroring the mailed link flow.
pub async fn reset_password(
    headers: HeaderMap,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult {
    let reset_token = extract_token_or(
        &headers,
        ApiError::bad_request("Password Reset Token is missing"),
        ApiError::bad_request("Invalid Password Reset Token"),
    )?;

    AdminService::new()
        .await?
        .reset_password(&payload.password, &payload.password_confirm, &reset_token)
        .await?;

    Ok(ApiResponse::message("Password successfully updated"))
}

/// GET /admins/me
pub async fn me(Extension(user): Extension<CurrentUser>) -> ApiResult<AdminProfile> {
    let profile = AdminService::new().await?.get_me(user.id).await?;
    Ok(ApiResponse::data(profile))
}
