use actix_web::web;

use crate::handlers::{home::home, json_error::not_found, system::health_check};

mod blog;
mod contact;
mod json_error;
mod projects;
mod seed;
mod users;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .service(health_check)
            .configure(projects::config_routes)
            .configure(blog::config_routes)
            .configure(seed::config_routes)
            .configure(users::config_routes)
            .configure(contact::config_routes)
    );

    cfg.default_service(web::to(not_found));
}
