use std::net::TcpListener;

use actix_web::{dev::Server, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::{
    middlewares::auth::AuthMiddleware,
    routes::configure_routes,
    settings::AppConfig,
    web::cors::cors_policy,
    AppState,
};

/// Builds the HTTP server on an already bound listener so tests can use port 0.
pub fn run(
    listener: TcpListener,
    state: web::Data<AppState>,
    config: &AppConfig,
) -> std::io::Result<Server> {
    let cors_config = config.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(AuthMiddleware)
            .wrap(NormalizePath::trim())
            .wrap(cors_policy(&cors_config))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count.max(1))
    .listen(listener)?
    .run();

    Ok(server)
}
