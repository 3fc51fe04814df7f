use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use crate::{entities::message::Message, errors::AppError, repositories::sqlx_repo::SqlxMessageRepo};

pub const MESSAGE_NOT_FOUND: &str = "Message not found";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create_message(&self, message: &Message) -> Result<Message, AppError>;
    /// Newest first.
    async fn list_messages(&self) -> Result<Vec<Message>, AppError>;
    async fn set_message_read(&self, id: &Uuid, read: bool) -> Result<Message, AppError>;
    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxMessageRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxMessageRepo { pool }
    }
}

fn row_to_message(row: PgRow) -> Result<Message, AppError> {
    Ok(Message {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        read: row.try_get("read")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl MessageRepository for SqlxMessageRepo {
    async fn create_message(&self, message: &Message) -> Result<Message, AppError> {
        let row = sqlx::query(
            r#"
            INSERT INTO messages (id, name, email, subject, message, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, subject, message, read, created_at
            "#,
        )
        .bind(message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.read)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;

        row_to_message(row)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        sqlx::query(
            "SELECT id, name, email, subject, message, read, created_at FROM messages ORDER BY created_at DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(row_to_message)
        .collect()
    }

    async fn set_message_read(&self, id: &Uuid, read: bool) -> Result<Message, AppError> {
        let row = sqlx::query(
            r#"
            UPDATE messages SET read = $2 WHERE id = $1
            RETURNING id, name, email, subject, message, read, created_at
            "#,
        )
        .bind(id)
        .bind(read)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(MESSAGE_NOT_FOUND.into()))?;

        row_to_message(row)
    }

    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(MESSAGE_NOT_FOUND.into()));
        }
        Ok(())
    }
}
