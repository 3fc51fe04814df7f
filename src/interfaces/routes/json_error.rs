use actix_web::web;

use crate::handlers::json_error::{json_error_handler, path_error_handler, query_error_handler};

/// Extractor failures answer with the same envelope as every other error.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler));
    cfg.app_data(web::PathConfig::default().error_handler(path_error_handler));
}
