use actix_web::web;

use crate::handlers::contact;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .route(web::post().to(contact::submit_contact_form))
    );

    cfg.service(
        web::scope("/messages")
            .service(
                web::resource("")
                    .route(web::get().to(contact::list_messages))
            )
            .service(
                web::resource("/{message_id}")
                    .route(web::patch().to(contact::mark_message))
                    .route(web::delete().to(contact::delete_message))
            )
    );
}
