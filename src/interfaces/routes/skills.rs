use actix_web::web;

use crate::handlers::skills;
use super::resource;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/skills")
            .service(
                resource("")
                    .route(web::get().to(skills::list_skills))
                    .route(web::post().to(skills::create_skill))
            )
            .service(
                resource("/featured")
                    .route(web::get().to(skills::featured_skills))
            )
            .service(
                resource("/category/{category}")
                    .route(web::get().to(skills::skills_by_category))
            )
            .service(
                resource("/{skill_id}")
                    .route(web::get().to(skills::get_skill))
                    .route(web::put().to(skills::update_skill))
                    .route(web::delete().to(skills::delete_skill))
            )
    );
}
