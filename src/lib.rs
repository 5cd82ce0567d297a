use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod seed;
pub mod shared_repos;

pub use domain::{entities, listing, password, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, mail, utils};

use auth::jwt::JwtService;
use repositories::{
    contact::ContactRepository, notifier::ContactNotifier, project::ProjectRepository,
    skill::SkillRepository, token::TokenServiceRepository, user::UserRepository,
};
use shared_repos::SharedRepositories;
use use_cases::{auth::AuthHandler, contact::ContactHandler, project::ProjectHandler, skill::SkillHandler};

pub type AppAuthHandler = AuthHandler<dyn UserRepository, dyn TokenServiceRepository>;
pub type AppProjectHandler = ProjectHandler<dyn ProjectRepository>;
pub type AppSkillHandler = SkillHandler<dyn SkillRepository>;
pub type AppContactHandler = ContactHandler<dyn ContactRepository, dyn ContactNotifier>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub project_handler: AppProjectHandler,
    pub skill_handler: AppSkillHandler,
    pub contact_handler: AppContactHandler,
}

impl AppState {
    pub fn new(
        config: &settings::AppConfig,
        repos: SharedRepositories,
        notifier: Arc<dyn ContactNotifier>,
    ) -> Self {
        let token_service: Arc<dyn TokenServiceRepository> = Arc::new(JwtService::new(config));

        AppState {
            auth_handler: AuthHandler::new(repos.user_repo, token_service),
            project_handler: ProjectHandler::new(repos.project_repo),
            skill_handler: SkillHandler::new(repos.skill_repo),
            contact_handler: ContactHandler::new(repos.contact_repo, notifier),
        }
    }
}
