use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};
use uuid::Uuid;

use crate::{
    entities::{token::{Claims, Identity}, user::Role},
    errors::AuthError,
    AppState,
};

/// Resolves a bearer token into an [`Identity`] on the request.
///
/// Requests without an `Authorization` header pass through anonymously; the admin
/// extractor decides per route whether that is acceptable. A header that is present
/// but malformed, expired or badly signed is rejected here with 401.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if req.method() == actix_web::http::Method::OPTIONS || !req.headers().contains_key("Authorization") {
                return service.call(req).await;
            }

            match resolve_identity(&req) {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    service.call(req).await
                }
                Err(e) => {
                    tracing::warn!(path = %req.path(), "Rejected bearer token: {}", e);
                    Ok(custom_error_response(req, e))
                }
            }
        })
    }
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn get_valid_claims(req: &ServiceRequest, state: &AppState) -> Result<Claims, AuthError> {
    let token = extract_token(req).ok_or(AuthError::MissingCredentials)?;
    let decoded = state.jwt_service.decode_jwt(&token)?;
    Ok(decoded.claims)
}

fn resolve_identity(req: &ServiceRequest) -> Result<Identity, AuthError> {
    let state = req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| {
            tracing::error!("AppState missing in middleware");
            AuthError::MissingCredentials
        })?;

    let claims = get_valid_claims(req, state)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

    Ok(Identity {
        user_id,
        role: Role::for_email(&claims.email, &state.admin_emails),
        email: claims.email,
    })
}

fn custom_error_response(req: ServiceRequest, err: AuthError) -> ServiceResponse<BoxBody> {
    req.into_response(err.error_response())
}
