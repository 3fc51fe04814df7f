use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::{
        option_fields::OptionField,
        schema::{
            new_validation_error, next_timestamp, now, validate_document, validate_slug, validate_tags,
            validate_title, validate_url, Difficulty, MAX_SLUG_LENGTH, MAX_TITLE_LENGTH, MIN_SLUG_LENGTH,
        },
        user::{Role, User},
    },
    errors::{AppError, FieldError},
    utils::html::sanitize_html,
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_DESCRIPTION_LENGTH: u64 = 500;
const MAX_EXCERPT_LENGTH: u64 = 500;
const MAX_SHORT_FIELD_LENGTH: u64 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───── Document ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH, message = "slug is required (3-80 characters)"),
        custom(function = "validate_slug")
    )]
    pub slug: String,

    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "title is required (at most 200 characters)"),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(length(min = 1, max = MAX_DESCRIPTION_LENGTH, message = "description is required (at most 500 characters)"))]
    pub description: String,

    #[validate(length(min = 1, max = MAX_EXCERPT_LENGTH, message = "excerpt is required (at most 500 characters)"))]
    pub excerpt: String,

    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,

    /// Reference to a user; serialized through [`BlogPostView`] as the joined author.
    #[serde(skip_serializing)]
    #[validate(custom(function = "validate_author"))]
    pub author: Uuid,

    pub published_at: DateTime<Utc>,

    #[validate(length(min = 1, max = MAX_SHORT_FIELD_LENGTH, message = "readTime is required (e.g. '5 min read')"))]
    pub read_time: String,

    #[validate(length(min = 1, max = MAX_SHORT_FIELD_LENGTH, message = "category is required"))]
    pub category: String,

    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    #[validate(
        length(min = 1, message = "image is required"),
        custom(function = "validate_url")
    )]
    pub image: String,

    #[validate(range(min = 0, message = "views cannot be negative"))]
    pub views: i64,

    #[validate(range(min = 0, message = "likes cannot be negative"))]
    pub likes: i64,

    pub featured: bool,
    pub status: PostStatus,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_author(author: &Uuid) -> Result<(), ValidationError> {
    if author.is_nil() {
        return Err(new_validation_error("required", "author is required"));
    }
    Ok(())
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub id: Uuid,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: Option<Role>,
}

/// A post with its `author` reference resolved against the users collection.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPostView {
    #[serde(flatten)]
    pub post: BlogPost,
    pub author: AuthorView,
}

impl BlogPostView {
    /// A missing user still yields a view; only the id is known then.
    pub fn new(post: BlogPost, author: Option<&User>) -> Self {
        let author = match author {
            Some(user) => AuthorView {
                id: user.id,
                name: Some(user.name.clone()),
                image: user.image.clone(),
                role: Some(user.role),
            },
            None => AuthorView {
                id: post.author,
                name: None,
                image: None,
                role: None,
            },
        };
        BlogPostView { post, author }
    }
}

// ───── Input Requests ───────────────────────────────────────────────

/// Body of `POST /api/posts` and `PUT /api/posts/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewBlogPostRequest {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub excerpt: String,
    pub content: String,
    pub author: Uuid,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image: String,
    pub views: i64,
    pub likes: i64,
    pub featured: bool,
    pub status: PostStatus,
    pub difficulty: Option<Difficulty>,
}

/// Body of `PATCH /api/posts/{id}`. Counters are not patchable.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPostPatch {
    pub title: OptionField<String>,
    pub slug: OptionField<String>,
    pub description: OptionField<String>,
    pub excerpt: OptionField<String>,
    pub content: OptionField<String>,
    pub author: OptionField<Uuid>,
    pub published_at: OptionField<DateTime<Utc>>,
    pub read_time: OptionField<String>,
    pub category: OptionField<String>,
    pub tags: OptionField<Vec<String>>,
    pub image: OptionField<String>,
    pub featured: OptionField<bool>,
    pub status: OptionField<PostStatus>,
    pub difficulty: OptionField<Difficulty>,
}

// ───── Conversions ──────────────────────────────────────────────────

impl BlogPost {
    /// Builds and validates a new document. Content is sanitized before validation.
    pub fn from_request(req: NewBlogPostRequest) -> Result<Self, AppError> {
        let missing = missing_required(&req);
        let post = Self::build(req);
        validate_document(&post, missing)?;
        Ok(post)
    }

    /// Full replacement keeping identity, creation time and counters.
    pub fn replaced_by(&self, req: NewBlogPostRequest) -> Result<Self, AppError> {
        let missing = missing_required(&req);
        let mut replacement = Self::build(req);
        replacement.id = self.id;
        replacement.created_at = self.created_at;
        replacement.views = self.views;
        replacement.likes = self.likes;
        replacement.updated_at = next_timestamp(self.updated_at);

        validate_document(&replacement, missing)?;
        Ok(replacement)
    }

    /// Merges a partial update in place. The caller re-validates the result.
    pub fn apply_patch(&mut self, patch: BlogPostPatch) {
        patch.title.apply_to(&mut self.title);
        patch.slug.apply_to(&mut self.slug);
        patch.description.apply_to(&mut self.description);
        patch.excerpt.apply_to(&mut self.excerpt);
        if let Some(content) = patch.content.into_option() {
            self.content = content.map(|c| sanitize_html(&c)).unwrap_or_default();
        }
        patch.author.apply_to(&mut self.author);
        match patch.published_at {
            OptionField::Unchanged => {}
            OptionField::SetToNull => self.published_at = now(),
            OptionField::SetToValue(at) => self.published_at = at,
        }
        patch.read_time.apply_to(&mut self.read_time);
        patch.category.apply_to(&mut self.category);
        patch.tags.apply_to(&mut self.tags);
        patch.image.apply_to(&mut self.image);
        patch.featured.apply_to(&mut self.featured);
        patch.status.apply_to(&mut self.status);
        patch.difficulty.apply_to(&mut self.difficulty);

        self.updated_at = next_timestamp(self.updated_at);
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    fn build(req: NewBlogPostRequest) -> Self {
        let created_at = now();
        BlogPost {
            id: Uuid::new_v4(),
            slug: req.slug,
            title: req.title,
            description: req.description,
            excerpt: req.excerpt,
            content: sanitize_html(&req.content),
            author: req.author,
            published_at: req.published_at.unwrap_or(created_at),
            read_time: req.read_time,
            category: req.category,
            tags: req.tags,
            image: req.image,
            views: req.views,
            likes: req.likes,
            featured: req.featured,
            status: req.status,
            difficulty: req.difficulty.unwrap_or_default(),
            created_at,
            updated_at: created_at,
        }
    }
}

fn missing_required(req: &NewBlogPostRequest) -> Vec<FieldError> {
    let mut missing = Vec::new();
    if req.difficulty.is_none() {
        missing.push(FieldError {
            field: "difficulty".into(),
            message: "difficulty is required".into(),
        });
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewBlogPostRequest {
        NewBlogPostRequest {
            title: "Async Rust in Practice".into(),
            slug: "async-rust-in-practice".into(),
            description: "Notes from shipping tokio services".into(),
            excerpt: "What we learned".into(),
            content: "<p>Body</p>".into(),
            author: Uuid::new_v4(),
            read_time: "5 min read".into(),
            category: "Rust".into(),
            image: "https://cdn.example.com/async.png".into(),
            difficulty: Some(Difficulty::Advanced),
            ..Default::default()
        }
    }

    fn field_names(err: AppError) -> Vec<String> {
        match err {
            AppError::ValidationError(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn defaults_and_sanitization() {
        let mut req = request();
        req.content = "<p>Hello</p><script>alert(1)</script>".into();

        let post = BlogPost::from_request(req).unwrap();
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.views, 0);
        assert_eq!(post.content, "<p>Hello</p>");
        assert_eq!(post.published_at, post.created_at);
    }

    #[test]
    fn missing_author_and_difficulty_are_reported_together() {
        let mut req = request();
        req.author = Uuid::nil();
        req.difficulty = None;
        req.title = String::new();

        let fields = field_names(BlogPost::from_request(req).unwrap_err());
        assert_eq!(fields, vec!["author", "difficulty", "title"]);
    }

    #[test]
    fn replace_keeps_counters() {
        let mut post = BlogPost::from_request(request()).unwrap();
        post.views = 12;
        post.likes = 3;

        let mut req = request();
        req.views = 999;
        let replaced = post.replaced_by(req).unwrap();

        assert_eq!(replaced.id, post.id);
        assert_eq!(replaced.views, 12);
        assert_eq!(replaced.likes, 3);
    }

    #[test]
    fn patch_null_resets_to_default() {
        let mut post = BlogPost::from_request(request()).unwrap();
        post.tags = vec!["rust".into()];

        let patch: BlogPostPatch =
            serde_json::from_str(r#"{"tags": null, "status": "published"}"#).unwrap();
        post.apply_patch(patch);

        assert!(post.tags.is_empty());
        assert!(post.is_published());
    }

    #[test]
    fn view_for_missing_author_carries_nulls() {
        let post = BlogPost::from_request(request()).unwrap();
        let author = post.author;

        let body = serde_json::to_value(BlogPostView::new(post, None)).unwrap();
        assert_eq!(body["author"]["id"], serde_json::json!(author));
        assert!(body["author"]["name"].is_null());
        assert!(body["author"]["role"].is_null());
        assert_eq!(body["readTime"], "5 min read");
    }
}
