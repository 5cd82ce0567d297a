pub mod auth;
pub mod contact;
pub mod extractors;
pub mod project;
pub mod skill;
