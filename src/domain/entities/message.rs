use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::schema::now;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100, message = "name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 100, message = "subject must be at most 100 characters"))]
    pub subject: Option<String>,

    #[validate(length(min = 5, max = 1000, message = "message must be between 5 and 1000 characters"))]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct MessagePatch {
    pub read: bool,
}

impl From<ContactForm> for Message {
    fn from(form: ContactForm) -> Self {
        Message {
            id: Uuid::new_v4(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            subject: form.subject.filter(|s| !s.trim().is_empty()),
            message: form.message,
            read: false,
            created_at: now(),
        }
    }
}
