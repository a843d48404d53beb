pub mod admin_service;
pub mod project_service;
pub mod story_service;
pub mod team_member_service;

pub use admin_service::AdminService;
pub use project_service::ProjectService;
pub use story_service::StoryService;
pub use team_member_service::TeamMemberService;
