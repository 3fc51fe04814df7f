use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::{
        envelope::ApiResponse,
        project::{NewProjectRequest, ProjectPatch},
    },
    errors::AppError,
    query::ProjectListParams,
    use_cases::extractors::AdminIdentity,
    AppState,
};

#[instrument(skip(state, query))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<ProjectListParams>,
) -> Result<impl Responder, AppError> {
    let (projects, pagination) = state
        .project_handler
        .list_projects(query.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(projects).with_pagination(pagination)))
}

#[instrument(skip(state))]
pub async fn get_project(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(project)))
}

#[instrument(skip(_admin, state, data))]
pub async fn create_project(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .create_project(data.into_inner())
        .await?;

    tracing::info!(slug = %project.slug, "Project created");
    Ok(HttpResponse::Created().json(ApiResponse::ok(project)))
}

/// `PUT` and `PATCH` share this handler; keys missing from the body keep their stored value.
#[instrument(skip(_admin, state, data))]
pub async fn update_project(
    _admin: AdminIdentity,
    slug: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<ProjectPatch>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .update_project(&slug, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(project)))
}

#[instrument(skip(_admin, state))]
pub async fn delete_project(
    _admin: AdminIdentity,
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete_project(&slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::acknowledged("Project deleted successfully")))
}

#[instrument(skip(state))]
pub async fn like_project(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let likes = state.project_handler.like_project(&slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({ "likes": likes }))))
}
