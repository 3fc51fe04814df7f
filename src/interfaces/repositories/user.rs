use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use crate::{
    entities::user::User,
    errors::AppError,
    repositories::sqlx_repo::{parse_column, SqlxUserRepo},
};

pub const USER_NOT_FOUND: &str = "User not found";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn create_user(&self, user: &User) -> Result<User, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
    /// Batched lookup for author joins; unknown ids are simply absent from the result.
    async fn get_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn delete_user(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxUserRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

fn row_to_user(row: PgRow) -> Result<User, AppError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        image: row.try_get("image")?,
        role: parse_column(&row, "role")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, image, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, image, role, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.image)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row_to_user(row)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        sqlx::query("SELECT id, name, email, image, role, created_at, updated_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(row_to_user)
            .transpose()
    }

    async fn get_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query("SELECT id, name, email, image, role, created_at, updated_at FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(row_to_user)
            .collect()
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        sqlx::query("SELECT id, name, email, image, role, created_at, updated_at FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(row_to_user)
            .collect()
    }

    async fn delete_user(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(USER_NOT_FOUND.into()));
        }
        Ok(())
    }
}
