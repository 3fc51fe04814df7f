use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::schema::{now, validate_optional_image};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Admin role is granted by membership in the configured allow-list.
    pub fn for_email(email: &str, admin_emails: &[String]) -> Self {
        if admin_emails.iter().any(|admin| admin.eq_ignore_ascii_case(email.trim())) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewUserRequest {
    #[validate(length(min = 1, max = 100, message = "name is required (at most 100 characters)"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_optional_image"))]
    pub image: Option<String>,
}

impl User {
    pub fn from_request(req: NewUserRequest, admin_emails: &[String]) -> Self {
        let created_at = now();
        let email = req.email.trim().to_lowercase();
        User {
            id: Uuid::new_v4(),
            name: req.name,
            role: Role::for_email(&email, admin_emails),
            email,
            image: req.image.filter(|url| !url.is_empty()),
            created_at,
            updated_at: created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_comes_from_allow_list() {
        let admins = vec!["owner@example.com".to_string()];

        assert_eq!(Role::for_email("Owner@Example.com", &admins), Role::Admin);
        assert_eq!(Role::for_email("guest@example.com", &admins), Role::User);
    }

    #[test]
    fn email_is_normalized() {
        let req = NewUserRequest {
            name: "Ada".into(),
            email: " ADA@example.com ".into(),
            image: Some(String::new()),
        };
        let user = User::from_request(req, &[]);

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.image, None);
        assert_eq!(user.role, Role::User);
    }
}
