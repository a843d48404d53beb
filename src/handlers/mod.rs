pub mod admins;
pub mod projects;
pub mod stories;
pub mod team_members;
