pub mod auth;
pub mod response;

pub use auth::{
    extract_bearer_token, extract_token_or, jwt_auth_middleware, require_admin,
    require_team_member, CurrentUser,
};
pub use response::{ApiResponse, ApiResult};
