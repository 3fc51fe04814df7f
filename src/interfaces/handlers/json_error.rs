use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    HttpRequest, HttpResponse,
};

use crate::{entities::envelope::ApiResponse, errors::AppError};

/// Malformed bodies are reported as a validation failure on the `body` field.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::Deserialize(e) => format!("invalid JSON: {}", e),
        JsonPayloadError::ContentType => "expected Content-Type: application/json".to_string(),
        other => other.to_string(),
    };
    AppError::field("body", message).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::field("query", err.to_string()).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::field("path", err.to_string()).into()
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::failure(format!(
        "Route {} {} not found",
        req.method(),
        req.path()
    )))
}
