use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        envelope::ApiResponse,
        message::{ContactForm, MessagePatch},
    },
    errors::AppError,
    use_cases::extractors::AdminIdentity,
    utils::get_client_ip::get_client_ip,
    AppState,
};

#[instrument(skip(req, state, data))]
pub async fn submit_contact_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<ContactForm>,
) -> Result<impl Responder, AppError> {
    let client_ip = get_client_ip(&req, state.trust_x_forwarded_for);

    let message = state
        .contact_handler
        .submit_message(data.into_inner(), &client_ip)
        .await?;

    let mut body = ApiResponse::ok(message);
    body.message = Some("Your message has been received.".into());
    Ok(HttpResponse::Created().json(body))
}

#[instrument(skip(_admin, state))]
pub async fn list_messages(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let messages = state.contact_handler.list_messages().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(messages)))
}

#[instrument(skip(_admin, state, data))]
pub async fn mark_message(
    _admin: AdminIdentity,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<MessagePatch>,
) -> Result<impl Responder, AppError> {
    let message = state
        .contact_handler
        .mark_message(&message_id, data.read)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(message)))
}

#[instrument(skip(_admin, state))]
pub async fn delete_message(
    _admin: AdminIdentity,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.contact_handler.delete_message(&message_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::acknowledged("Message deleted successfully")))
}
