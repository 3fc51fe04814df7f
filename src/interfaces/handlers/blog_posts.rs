use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::{
        blog_post::{BlogPostPatch, NewBlogPostRequest},
        envelope::ApiResponse,
    },
    errors::AppError,
    query::PostListParams,
    use_cases::extractors::AdminIdentity,
    AppState,
};

#[instrument(skip(state, query))]
pub async fn get_all_blog_posts(
    state: web::Data<AppState>,
    query: web::Query<PostListParams>,
) -> Result<impl Responder, AppError> {
    let (posts, pagination) = state
        .blog_handler
        .list_blog_posts(query.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts).with_pagination(Some(pagination))))
}

#[instrument(skip(state))]
pub async fn get_blog_post_by_id(
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.get_blog_post_by_id(&post_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

#[instrument(skip(_admin, state, data))]
pub async fn create_blog_post(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    data: web::Json<NewBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.create_blog_post(data.into_inner()).await?;

    tracing::info!(slug = %post.post.slug, "Blog post created");
    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

#[instrument(skip(_admin, state, data))]
pub async fn replace_blog_post(
    _admin: AdminIdentity,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<NewBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let post = state
        .blog_handler
        .replace_blog_post(&post_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

#[instrument(skip(_admin, state, data))]
pub async fn update_blog_post(
    _admin: AdminIdentity,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<BlogPostPatch>,
) -> Result<impl Responder, AppError> {
    let post = state
        .blog_handler
        .patch_blog_post(&post_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

#[instrument(skip(_admin, state))]
pub async fn delete_blog_post(
    _admin: AdminIdentity,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.blog_handler.delete_blog_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::acknowledged("Blog post deleted successfully")))
}

#[instrument(skip(state))]
pub async fn like_blog_post(
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let likes = state.blog_handler.like_blog_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({ "likes": likes }))))
}
