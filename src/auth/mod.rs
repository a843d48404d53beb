use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

pub mod password;
pub mod token;

/// Requester role carried inside the JWT. Wire values match the original
/// frontend contract ("admin" / "teamMember").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "teamMember")]
    TeamMember,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub role: Role,
    /// Owning admin id, present on team-member tokens only
    #[serde(
        rename = "belongsTo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub belongs_to: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn admin(id: Uuid) -> Self {
        Self::new(id, Role::Admin, None)
    }

    pub fn team_member(id: Uuid, belongs_to: Uuid) -> Self {
        Self::new(id, Role::TeamMember, Some(belongs_to))
    }

    fn new(id: Uuid, role: Role, belongs_to: Option<Uuid>) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            id,
            role,
            belongs_to,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn verify_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

#[cfg(test)]
pub(crate) fn ensure_test_secret() {
    // Shared across unit tests; must be set before the config singleton is read
    std::env::set_var("JWT_SECRET", "unit-test-secret");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_claims_round_trip() {
        ensure_test_secret();
        let id = Uuid::new_v4();
        let token = generate_jwt(&Claims::admin(id)).unwrap();
        let claims = verify_jwt(&token).unwrap();

        assert_eq!(claims.id, id);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.belongs_to.is_none());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn team_member_claims_carry_owning_admin() {
        ensure_test_secret();
        let id = Uuid::new_v4();
        let admin_id = Uuid::new_v4();
        let token = generate_jwt(&Claims::team_member(id, admin_id)).unwrap();
        let claims = verify_jwt(&token).unwrap();

        assert_eq!(claims.role, Role::TeamMember);
        assert_eq!(claims.belongs_to, Some(admin_id));
    }

    #[test]
    fn expired_token_is_rejected() {
        ensure_test_secret();
        let mut claims = Claims::admin(Uuid::new_v4());
        claims.iat = Utc::now().timestamp() - 7200;
        claims.exp = Utc::now().timestamp() - 3600;

        let token = generate_jwt(&claims).unwrap();
        assert!(verify_jwt(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        ensure_test_secret();
        let token = generate_jwt(&Claims::admin(Uuid::new_v4())).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        assert!(verify_jwt(&tampered).is_err());
    }

    #[test]
    fn role_serializes_to_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::TeamMember).unwrap(),
            "\"teamMember\""
        );
    }
}
