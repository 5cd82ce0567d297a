use actix_web::web;

use crate::handlers::contacts;
use super::resource;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contact")
            .service(
                resource("")
                    .route(web::post().to(contacts::submit_contact))
                    .route(web::get().to(contacts::list_contacts))
            )
            .service(
                resource("/{contact_id}")
                    .route(web::get().to(contacts::get_contact))
                    .route(web::delete().to(contacts::delete_contact))
            )
            .service(
                resource("/{contact_id}/status")
                    .route(web::put().to(contacts::update_contact_status))
            )
    );
}
