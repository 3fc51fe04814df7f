use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use crate::{entities::token::Identity, errors::AuthError};

/// Extractor guarding admin routes.
/// Returns 401 if the caller is not authenticated and 403 if they are not an admin.
/// Usage: Add `_admin: AdminIdentity` as a parameter to your handler function.
#[derive(Debug)]
pub struct AdminIdentity(pub Identity);

impl FromRequest for AdminIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Identity>() {
            Some(identity) if identity.is_admin() => {
                ready(Ok(AdminIdentity(identity.clone())))
            }
            Some(identity) => {
                tracing::warn!(user_id = %identity.user_id, "Non-admin caller rejected");
                ready(Err(AuthError::Forbidden("Admin access required".into()).into()))
            }
            None => {
                ready(Err(AuthError::MissingCredentials.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use uuid::Uuid;

    use crate::entities::user::Role;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            role,
        }
    }

    #[actix_rt::test]
    async fn anonymous_caller_gets_401() {
        let req = TestRequest::default().to_http_request();
        let err = AdminIdentity::extract(&req).await.unwrap_err();
        assert_eq!(err.error_response().status(), 401);
    }

    #[actix_rt::test]
    async fn regular_user_gets_403() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(identity(Role::User));

        let err = AdminIdentity::extract(&req).await.unwrap_err();
        assert_eq!(err.error_response().status(), 403);
    }

    #[actix_rt::test]
    async fn admin_passes() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(identity(Role::Admin));

        let AdminIdentity(found) = AdminIdentity::extract(&req).await.unwrap();
        assert!(found.is_admin());
    }
}
