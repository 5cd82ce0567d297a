use actix_web::web;

use crate::handlers::auth;
use super::resource;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(resource("/register").route(web::post().to(auth::register)))
            .service(resource("/login").route(web::post().to(auth::login)))
            .service(resource("/me").route(web::get().to(auth::me)))
            .service(resource("/profile").route(web::put().to(auth::update_profile)))
    );
}
