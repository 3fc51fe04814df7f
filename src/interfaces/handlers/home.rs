use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

use crate::entities::envelope::ApiResponse;

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::ok(json!({
        "message": "Welcome to the Portfolio API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/api/health", "/api/projects", "/api/posts", "/api/seed", "/api/contact"]
    })))
}
