use std::sync::Arc;

use validator::Validate;

use crate::{
    entities::user::{NewUserRequest, User},
    errors::AppError,
    repositories::user::{UserRepository, USER_NOT_FOUND},
    utils::valid_uuid::valid_uuid,
};

pub struct UserHandler {
    pub user_repo: Arc<dyn UserRepository>,
    admin_emails: Vec<String>,
}

impl UserHandler {
    pub fn new(user_repo: Arc<dyn UserRepository>, admin_emails: Vec<String>) -> Self {
        UserHandler {
            user_repo,
            admin_emails,
        }
    }

    /// Registers a user profile. The role is derived from the admin allow-list.
    pub async fn create_user(&self, request: NewUserRequest) -> Result<User, AppError> {
        request.validate()?;

        let user = User::from_request(request, &self.admin_emails);
        self.user_repo.create_user(&user).await
    }

    pub async fn get_user(&self, id: &str) -> Result<User, AppError> {
        let valid_id = valid_uuid(id, "id")?;

        self.user_repo
            .get_user_by_id(&valid_id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_users().await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id, "id")?;
        self.user_repo.delete_user(&valid_id).await
    }
}
