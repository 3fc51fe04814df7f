use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{envelope::ApiResponse, user::NewUserRequest},
    errors::AppError,
    use_cases::extractors::AdminIdentity,
    AppState,
};

#[instrument(skip(_admin, state))]
pub async fn list_users(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let users = state.user_handler.list_users().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(users)))
}

#[instrument(skip(_admin, state, data))]
pub async fn create_user(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    data: web::Json<NewUserRequest>,
) -> Result<impl Responder, AppError> {
    let user = state.user_handler.create_user(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(user)))
}

#[instrument(skip(_admin, state))]
pub async fn get_user(
    _admin: AdminIdentity,
    user_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user = state.user_handler.get_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

#[instrument(skip(_admin, state))]
pub async fn delete_user(
    _admin: AdminIdentity,
    user_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.user_handler.delete_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::acknowledged("User deleted successfully")))
}
