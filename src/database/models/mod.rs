pub mod admin;
pub mod contributor;
pub mod project;
pub mod story;
pub mod task;
pub mod team_member;

pub use admin::{Admin, AdminAccountStatus};
pub use contributor::{Contributor, ContributorStatus};
pub use project::{Project, ProjectStatus, ProjectWithContributorCount};
pub use story::{Story, StoryStatus};
pub use task::{SubTask, Task, TaskStatus};
pub use team_member::{TeamMember, TeamMemberAccountStatus};
