use std::sync::Arc;

use validator::Validate;

use crate::{
    entities::message::{ContactForm, Message},
    errors::AppError,
    limiter::rate_limiter::{RateDecision, RateLimiterStore},
    repositories::message::MessageRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct ContactHandler {
    pub message_repo: Arc<dyn MessageRepository>,
    limiter: RateLimiterStore,
}

impl ContactHandler {
    pub fn new(message_repo: Arc<dyn MessageRepository>, limiter: RateLimiterStore) -> Self {
        ContactHandler {
            message_repo,
            limiter,
        }
    }

    pub fn limiter(&self) -> &RateLimiterStore {
        &self.limiter
    }

    /// Stores a contact message. Only well-formed submissions count against the sender's quota.
    pub async fn submit_message(&self, form: ContactForm, client_ip: &str) -> Result<Message, AppError> {
        form.validate()?;

        if let RateDecision::Limited { retry_after_secs } = self.limiter.check(client_ip) {
            tracing::warn!(client_ip, "Contact form rate limit hit");
            return Err(AppError::RateLimited(retry_after_secs));
        }

        let message = Message::from(form);
        self.message_repo.create_message(&message).await
    }

    /// Lists all contact messages, newest first
    pub async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        self.message_repo.list_messages().await
    }

    pub async fn mark_message(&self, id: &str, read: bool) -> Result<Message, AppError> {
        let valid_id = valid_uuid(id, "id")?;
        self.message_repo.set_message_read(&valid_id, read).await
    }

    /// Deletes a contact message by its ID
    pub async fn delete_message(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id, "id")?;
        self.message_repo.delete_message(&valid_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::message::MockMessageRepository;

    fn form() -> ContactForm {
        ContactForm {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            subject: None,
            message: "Hello there, nice portfolio!".into(),
        }
    }

    #[actix_rt::test]
    async fn quota_is_enforced_per_client() {
        let mut repo = MockMessageRepository::new();
        repo.expect_create_message()
            .times(2)
            .returning(|m| Ok(m.clone()));

        let handler = ContactHandler::new(Arc::new(repo), RateLimiterStore::per_hour(1));

        handler.submit_message(form(), "10.0.0.1").await.unwrap();
        let err = handler.submit_message(form(), "10.0.0.1").await.unwrap_err();
        assert!(matches!(err, AppError::RateLimited(secs) if secs > 0));

        handler.submit_message(form(), "10.0.0.2").await.unwrap();
    }

    #[actix_rt::test]
    async fn invalid_form_does_not_consume_quota() {
        let mut repo = MockMessageRepository::new();
        repo.expect_create_message()
            .times(1)
            .returning(|m| Ok(m.clone()));

        let handler = ContactHandler::new(Arc::new(repo), RateLimiterStore::per_hour(1));

        let mut bad = form();
        bad.email = "nope".into();
        assert!(matches!(
            handler.submit_message(bad, "10.0.0.1").await,
            Err(AppError::ValidationError(_))
        ));

        handler.submit_message(form(), "10.0.0.1").await.unwrap();
    }
}
