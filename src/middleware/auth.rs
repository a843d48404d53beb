use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{verify_jwt, Claims, Role};
use crate::error::ApiError;

/// Authenticated requester context extracted from the JWT
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
    pub belongs_to: Option<Uuid>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            role: claims.role,
            belongs_to: claims.belongs_to,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects the
/// requester context as a request extension
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let claims =
        verify_jwt(&token).map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

    request.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(request).await)
}

/// Route gate: only admin tokens pass
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&request, Role::Admin)?;
    Ok(next.run(request).await)
}

/// Route gate: only team-member tokens pass
pub async fn require_team_member(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&request, Role::TeamMember)?;
    Ok(next.run(request).await)
}

fn require_role(request: &Request, role: Role) -> Result<(), ApiError> {
    match request.extensions().get::<CurrentUser>() {
        Some(user) if user.role == role => Ok(()),
        Some(_) => Err(ApiError::not_yours()),
        None => Err(ApiError::unauthorized(
            "You are not logged in. Please, log in",
        )),
    }
}

/// Extract a bearer token from the Authorization header, with caller-chosen
/// errors. The JWT middleware and the handlers that accept one-time tokens
/// the same way (password reset, invite redemption) each report a missing or
/// malformed header in their own words.
pub fn extract_token_or(
    headers: &HeaderMap,
    missing: ApiError,
    malformed: ApiError,
) -> Result<String, ApiError> {
    let auth_header = match headers.get("authorization") {
        Some(value) => value,
        None => return Err(missing),
    };

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(_) => return Err(malformed),
    };

    match auth_str.split_once(' ') {
        Some(("Bearer", token)) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(malformed),
    }
}

/// Bearer extraction with the JWT middleware's error wording
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    extract_token_or(
        headers,
        ApiError::unauthorized("You are not logged in. Please, log in"),
        ApiError::bad_request("Not Valid Token"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = extract_bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn malformed_header_is_bad_request() {
        for value in ["Bearer", "Bearer ", "Basic abc", "just-a-token"] {
            let err = extract_bearer_token(&headers_with(value)).unwrap_err();
            assert_eq!(err.status_code(), 400, "value: {value}");
        }
    }

    #[test]
    fn well_formed_bearer_is_extracted() {
        let token = extract_bearer_token(&headers_with("Bearer abc.def.ghi")).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn custom_errors_are_passed_through() {
        let err = extract_token_or(
            &HeaderMap::new(),
            ApiError::unauthorized("Invite Token is missing"),
            ApiError::bad_request("Token was not sent in correct form"),
        )
        .unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.message(), "Invite Token is missing");

        let err = extract_token_or(
            &headers_with("Basic abc"),
            ApiError::unauthorized("Invite Token is missing"),
            ApiError::bad_request("Token was not sent in correct form"),
        )
        .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Token was not sent in correct form");
    }
}
