use std::{borrow::Cow, fmt, str::FromStr};

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::{AppError, FieldError};

// ───── Constants ──────────────────────────────────────────────────────
pub const MIN_SLUG_LENGTH: u64 = 3;
pub const MAX_SLUG_LENGTH: u64 = 80;
pub const MAX_TITLE_LENGTH: u64 = 200;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current time at the store's microsecond precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Returns a timestamp strictly after `previous`, even when the clock has not advanced
/// past it at storage precision.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

// ───── Validation Helpers ───────────────────────────────────────────
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");

    if !well_formed {
        let mut err = ValidationError::new("slug_format");
        err.message = Some(Cow::Owned(format!(
            "slug must be lowercase letters, digits and single hyphens (try '{}')",
            slug::slugify(slug)
        )));
        return Err(err);
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().len() != title.len() {
        return Err(new_validation_error("title_whitespace", "title must not have leading or trailing whitespace"));
    }
    Ok(())
}

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "invalid URL format")),
    }
}

/// Same as [`validate_url`] but an empty string means "no image yet".
pub fn validate_optional_image(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Ok(());
    }
    validate_url(url)
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", "too many tags provided"));
    }
    if tags.iter().any(|tag| tag.trim().is_empty() || tag.len() > MAX_TAG_LENGTH) {
        return Err(new_validation_error("invalid_tag_length", "tags must be between 1 and 40 characters"));
    }
    Ok(())
}

/// Validates a whole document and folds in checks the derive cannot express, so a
/// single response lists every failing field.
pub fn validate_document<T: Validate>(document: &T, mut extra: Vec<FieldError>) -> Result<(), AppError> {
    if let Err(errors) = document.validate() {
        if let AppError::ValidationError(fields) = AppError::from(errors) {
            extra.extend(fields);
        }
    }

    if extra.is_empty() {
        return Ok(());
    }
    extra.sort_by(|a, b| a.field.cmp(&b.field));
    Err(AppError::ValidationError(extra))
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(validate_slug("ai-code-reviewer").is_ok());
        assert!(validate_slug("v2").is_ok());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("double--hyphen").is_err());

        let err = validate_slug("My Project").unwrap_err();
        assert!(err.message.unwrap().contains("my-project"));
    }

    #[test]
    fn next_timestamp_is_strictly_increasing() {
        let future = Utc::now() + Duration::seconds(5);
        assert!(next_timestamp(future) > future);

        let past = Utc::now() - Duration::seconds(5);
        assert!(next_timestamp(past) > past);
    }

    #[test]
    fn empty_image_is_allowed() {
        assert!(validate_optional_image("").is_ok());
        assert!(validate_optional_image("https://cdn.example.com/hero.png").is_ok());
        assert!(validate_optional_image("ftp://cdn.example.com/hero.png").is_err());
    }
}
