#![allow(dead_code, unused_macros)]

use std::sync::Arc;

use actix_web::web;
use portfolio_api::{
    entities::user::{RegisterUser, User},
    mail::smtp::LogNotifier,
    seed::create_admin,
    settings::AppConfig,
    shared_repos::SharedRepositories,
    AppState,
};
use serde_json::{json, Value};

pub const ADMIN_PASSWORD: &str = "admin-pass-123";
pub const USER_PASSWORD: &str = "user-pass-123";

/// Application state over a fresh in-memory store.
pub struct TestApp {
    pub config: AppConfig,
    pub repos: SharedRepositories,
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::for_testing();
        let repos = SharedRepositories::in_memory();
        let state = web::Data::new(AppState::new(&config, repos.clone(), Arc::new(LogNotifier)));

        TestApp { config, repos, state }
    }

    pub async fn admin(&self) -> (User, String) {
        let admin = create_admin(self.repos.user_repo.as_ref(), "site_admin", "admin@example.com", ADMIN_PASSWORD)
            .await
            .expect("Failed to create admin");
        let token = self.state.auth_handler
            .create_auth_response(admin.clone())
            .expect("Failed to sign admin token")
            .token;

        (admin, token)
    }

    pub async fn user(&self, username: &str, email: &str) -> String {
        self.state.auth_handler
            .register(RegisterUser {
                username: Some(username.to_string()),
                email: Some(email.to_string()),
                password: Some(USER_PASSWORD.to_string()),
            })
            .await
            .expect("Failed to register user")
            .token
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

pub fn sample_project(title: &str, featured: bool) -> Value {
    json!({
        "title": title,
        "description": "A project used by the integration tests",
        "technologies": ["Rust", "actix-web"],
        "category": "web",
        "featured": featured,
        "startDate": "2024-01-15"
    })
}

pub fn sample_skill(name: &str, proficiency: i64) -> Value {
    json!({
        "name": name,
        "category": "backend",
        "proficiency": proficiency,
        "color": "#DEA584"
    })
}

/// Builds the full application, wired as in `main`, around a [`TestApp`] state.
macro_rules! init_app {
    ($app:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($app.state.clone())
                .wrap(portfolio_api::middlewares::auth::AuthMiddleware)
                .wrap(actix_web::middleware::NormalizePath::trim())
                .configure(portfolio_api::routes::configure_routes)
                .default_service(actix_web::web::to(portfolio_api::handlers::home::not_found)),
        )
        .await
    };
}
