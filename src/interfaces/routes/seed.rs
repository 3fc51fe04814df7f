use actix_web::web;

use crate::handlers::seed;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/seed")
            .route(web::post().to(seed::run_seed))
            .route(web::get().to(seed::seed_status))
    );
}
