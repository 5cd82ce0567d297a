use actix_web::{web, Resource};

use crate::handlers::{
    home::{home, not_found},
    system::health_check,
};

mod auth;
mod contact;
mod json_error;
mod projects;
mod skills;

/// A resource that answers unsupported methods with the not-found envelope
/// instead of a bare 405.
fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(not_found))
}

/// Registers every route. Unmatched paths are left to the app's default service.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/").route(web::get().to(home)));

    cfg.service(
        web::scope("/api")
            .service(resource("/health").route(web::get().to(health_check)))
            .configure(projects::config_routes)
            .configure(skills::config_routes)
            .configure(contact::config_routes)
            .configure(auth::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
