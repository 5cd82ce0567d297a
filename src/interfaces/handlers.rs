pub mod auth;
pub mod contacts;
pub mod home;
pub mod json_error;
pub mod projects;
pub mod skills;
pub mod system;
