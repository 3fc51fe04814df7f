use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{
    option_fields::OptionField,
    schema::{
        next_timestamp, now, validate_optional_image, validate_slug, validate_tags, validate_title,
        validate_url, Difficulty, MAX_SLUG_LENGTH, MAX_TITLE_LENGTH, MIN_SLUG_LENGTH,
    },
};

const MAX_DESCRIPTION_LENGTH: u64 = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    #[default]
    Fullstack,
    Frontend,
    Backend,
    Mobile,
    Ai,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Fullstack => "fullstack",
            ProjectCategory::Frontend => "frontend",
            ProjectCategory::Backend => "backend",
            ProjectCategory::Mobile => "mobile",
            ProjectCategory::Ai => "ai",
        }
    }
}

impl FromStr for ProjectCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fullstack" => Ok(ProjectCategory::Fullstack),
            "frontend" => Ok(ProjectCategory::Frontend),
            "backend" => Ok(ProjectCategory::Backend),
            "mobile" => Ok(ProjectCategory::Mobile),
            "ai" => Ok(ProjectCategory::Ai),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Completed,
    InProgress,
    Planned,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "completed",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Planned => "planned",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(ProjectStatus::Completed),
            "in-progress" => Ok(ProjectStatus::InProgress),
            "planned" => Ok(ProjectStatus::Planned),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStats {
    #[validate(length(max = 50, message = "completionTime must be at most 50 characters"))]
    pub completion_time: String,

    #[validate(range(min = 1, max = 1000, message = "teamSize must be between 1 and 1000"))]
    pub team_size: u32,

    #[validate(range(min = 1, max = 10, message = "complexity must be between 1 and 10"))]
    pub complexity: u8,

    #[validate(range(min = 0, message = "views cannot be negative"))]
    pub views: i64,

    #[validate(range(min = 0, message = "likes cannot be negative"))]
    pub likes: i64,
}

impl Default for ProjectStats {
    fn default() -> Self {
        ProjectStats {
            completion_time: String::new(),
            team_size: 1,
            complexity: 5,
            views: 0,
            likes: 0,
        }
    }
}

/// Lighthouse-style scores, each 0-100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPerformance {
    #[validate(range(max = 100, message = "score must be between 0 and 100"))]
    pub performance: u8,

    #[validate(range(max = 100, message = "score must be between 0 and 100"))]
    pub accessibility: u8,

    #[validate(range(max = 100, message = "score must be between 0 and 100"))]
    pub best_practices: u8,

    #[validate(range(max = 100, message = "score must be between 0 and 100"))]
    pub seo: u8,
}

// ───── Document ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
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

    pub long_description: String,

    #[validate(custom(function = "validate_optional_image"))]
    pub image: String,

    pub category: ProjectCategory,
    pub status: ProjectStatus,
    pub difficulty: Difficulty,

    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub screenshots: Vec<String>,
    pub challenges: Vec<String>,
    pub solutions: Vec<String>,

    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    pub lessons_learned: Vec<String>,
    pub future_improvements: Vec<String>,

    #[validate(custom(function = "validate_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub live_url: Option<String>,

    #[validate(nested)]
    pub stats: ProjectStats,

    #[validate(nested)]
    pub performance: ProjectPerformance,

    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Input Requests ───────────────────────────────────────────────

/// Body of `POST /api/projects`.
///
/// Missing keys fall back to their defaults; the resulting document is then validated
/// as a whole so every failing field is reported at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProjectRequest {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub long_description: String,
    pub image: String,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    pub difficulty: Difficulty,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
    pub screenshots: Vec<String>,
    pub challenges: Vec<String>,
    pub solutions: Vec<String>,
    pub tags: Vec<String>,
    pub lessons_learned: Vec<String>,
    pub future_improvements: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub stats: ProjectStats,
    pub performance: ProjectPerformance,
    pub featured: bool,
}

/// Body of `PUT` and `PATCH /api/projects/{slug}`. Absent keys keep their stored value,
/// `null` resets a field to its default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub title: OptionField<String>,
    pub slug: OptionField<String>,
    pub description: OptionField<String>,
    pub long_description: OptionField<String>,
    pub image: OptionField<String>,
    pub category: OptionField<ProjectCategory>,
    pub status: OptionField<ProjectStatus>,
    pub difficulty: OptionField<Difficulty>,
    pub technologies: OptionField<Vec<String>>,
    pub features: OptionField<Vec<String>>,
    pub screenshots: OptionField<Vec<String>>,
    pub challenges: OptionField<Vec<String>>,
    pub solutions: OptionField<Vec<String>>,
    pub tags: OptionField<Vec<String>>,
    pub lessons_learned: OptionField<Vec<String>>,
    pub future_improvements: OptionField<Vec<String>>,
    pub github_url: OptionField<String>,
    pub live_url: OptionField<String>,
    pub stats: OptionField<ProjectStatsPatch>,
    pub performance: OptionField<ProjectPerformancePatch>,
    pub featured: OptionField<bool>,
}

/// `stats` inside a project update. The counters are not writable here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStatsPatch {
    pub completion_time: OptionField<String>,
    pub team_size: OptionField<u32>,
    pub complexity: OptionField<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPerformancePatch {
    pub performance: OptionField<u8>,
    pub accessibility: OptionField<u8>,
    pub best_practices: OptionField<u8>,
    pub seo: OptionField<u8>,
}

#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub slug: String,
    pub title: String,
}

// ───── Conversions ──────────────────────────────────────────────────

impl ProjectStats {
    fn merge(&mut self, patch: ProjectStatsPatch) {
        let defaults = ProjectStats::default();
        merge_field(patch.completion_time, &mut self.completion_time, defaults.completion_time);
        merge_field(patch.team_size, &mut self.team_size, defaults.team_size);
        merge_field(patch.complexity, &mut self.complexity, defaults.complexity);
    }

    /// Back to defaults, counters excluded.
    fn reset_details(&mut self) {
        self.merge(ProjectStatsPatch {
            completion_time: OptionField::SetToNull,
            team_size: OptionField::SetToNull,
            complexity: OptionField::SetToNull,
        });
    }
}

impl ProjectPerformance {
    fn merge(&mut self, patch: ProjectPerformancePatch) {
        patch.performance.apply_to(&mut self.performance);
        patch.accessibility.apply_to(&mut self.accessibility);
        patch.best_practices.apply_to(&mut self.best_practices);
        patch.seo.apply_to(&mut self.seo);
    }
}

/// Like `OptionField::apply_to`, but `null` resets to the document default instead of `T::default()`.
fn merge_field<T>(change: OptionField<T>, target: &mut T, default: T) {
    match change {
        OptionField::Unchanged => {}
        OptionField::SetToNull => *target = default,
        OptionField::SetToValue(v) => *target = v,
    }
}

impl Project {
    /// Builds a fresh document with a generated id. Not validated yet.
    pub fn from_request(req: NewProjectRequest) -> Self {
        let created_at = now();
        Project {
            id: Uuid::new_v4(),
            slug: req.slug,
            title: req.title,
            description: req.description,
            long_description: req.long_description,
            image: req.image,
            category: req.category,
            status: req.status,
            difficulty: req.difficulty,
            technologies: req.technologies,
            features: req.features,
            screenshots: req.screenshots,
            challenges: req.challenges,
            solutions: req.solutions,
            tags: req.tags,
            lessons_learned: req.lessons_learned,
            future_improvements: req.future_improvements,
            github_url: req.github_url,
            live_url: req.live_url,
            stats: req.stats,
            performance: req.performance,
            featured: req.featured,
            created_at,
            updated_at: created_at,
        }
    }

    /// Merges a partial update. Counters are only changed through the like/view increments.
    pub fn apply_patch(&mut self, patch: ProjectPatch) {
        patch.title.apply_to(&mut self.title);
        patch.slug.apply_to(&mut self.slug);
        patch.description.apply_to(&mut self.description);
        patch.long_description.apply_to(&mut self.long_description);
        patch.image.apply_to(&mut self.image);
        patch.category.apply_to(&mut self.category);
        patch.status.apply_to(&mut self.status);
        patch.difficulty.apply_to(&mut self.difficulty);
        patch.technologies.apply_to(&mut self.technologies);
        patch.features.apply_to(&mut self.features);
        patch.screenshots.apply_to(&mut self.screenshots);
        patch.challenges.apply_to(&mut self.challenges);
        patch.solutions.apply_to(&mut self.solutions);
        patch.tags.apply_to(&mut self.tags);
        patch.lessons_learned.apply_to(&mut self.lessons_learned);
        patch.future_improvements.apply_to(&mut self.future_improvements);
        patch.github_url.apply_to_option(&mut self.github_url);
        patch.live_url.apply_to_option(&mut self.live_url);
        patch.featured.apply_to(&mut self.featured);

        match patch.stats {
            OptionField::Unchanged => {}
            OptionField::SetToNull => self.stats.reset_details(),
            OptionField::SetToValue(stats) => self.stats.merge(stats),
        }
        match patch.performance {
            OptionField::Unchanged => {}
            OptionField::SetToNull => self.performance = ProjectPerformance::default(),
            OptionField::SetToValue(performance) => self.performance.merge(performance),
        }

        self.updated_at = next_timestamp(self.updated_at);
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    fn request() -> NewProjectRequest {
        NewProjectRequest {
            title: "Realtime Chat".into(),
            slug: "realtime-chat".into(),
            description: "WebSocket chat with presence".into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_applied() {
        let project = Project::from_request(request());

        assert!(project.validate().is_ok());
        assert_eq!(project.category, ProjectCategory::Fullstack);
        assert_eq!(project.status, ProjectStatus::Completed);
        assert_eq!(project.difficulty, Difficulty::Intermediate);
        assert_eq!(project.stats.team_size, 1);
        assert_eq!(project.stats.complexity, 5);
        assert!(!project.featured);
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn every_missing_required_field_is_reported() {
        let project = Project::from_request(NewProjectRequest::default());
        let AppError::ValidationError(fields) = AppError::from(project.validate().unwrap_err()) else {
            panic!("expected validation error");
        };

        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert!(names.contains(&"title"));
        assert!(names.contains(&"slug"));
        assert!(names.contains(&"description"));
    }

    #[test]
    fn nested_scores_are_validated() {
        let mut req = request();
        req.performance.seo = 120;
        req.stats.team_size = 0;

        let errors = Project::from_request(req).validate().unwrap_err();
        let AppError::ValidationError(fields) = AppError::from(errors) else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn patch_keeps_untouched_fields_and_counters() {
        let mut project = Project::from_request(request());
        project.stats.views = 42;
        project.live_url = Some("https://chat.example.com".into());
        let before = project.clone();

        let patch: ProjectPatch = serde_json::from_str(
            r#"{"title": "X", "liveUrl": null, "stats": {"teamSize": 3}}"#,
        )
        .unwrap();
        project.apply_patch(patch);

        assert_eq!(project.title, "X");
        assert_eq!(project.live_url, None);
        assert_eq!(project.stats.team_size, 3);
        assert_eq!(project.stats.views, 42);
        assert_eq!(project.description, before.description);
        assert!(project.updated_at > before.updated_at);
    }

    #[test]
    fn nested_patch_merges_field_by_field() {
        let mut project = Project::from_request(request());
        project.stats = ProjectStats {
            completion_time: "3 months".into(),
            team_size: 2,
            complexity: 9,
            views: 10,
            likes: 4,
        };
        project.performance.seo = 90;
        project.performance.accessibility = 80;

        let patch: ProjectPatch = serde_json::from_str(
            r#"{"stats": {"teamSize": 4, "likes": 999}, "performance": {"seo": 95}}"#,
        )
        .unwrap();
        project.apply_patch(patch);

        assert_eq!(project.stats.team_size, 4);
        assert_eq!(project.stats.completion_time, "3 months");
        assert_eq!(project.stats.complexity, 9);
        assert_eq!(project.stats.likes, 4);
        assert_eq!(project.performance.seo, 95);
        assert_eq!(project.performance.accessibility, 80);
    }

    #[test]
    fn null_stats_resets_details_but_not_counters() {
        let mut project = Project::from_request(request());
        project.stats.complexity = 9;
        project.stats.team_size = 6;
        project.stats.views = 12;

        let patch: ProjectPatch = serde_json::from_str(r#"{"stats": {"complexity": null}}"#).unwrap();
        project.apply_patch(patch);
        assert_eq!(project.stats.complexity, 5);
        assert_eq!(project.stats.team_size, 6);

        let patch: ProjectPatch = serde_json::from_str(r#"{"stats": null}"#).unwrap();
        project.apply_patch(patch);
        assert_eq!(project.stats.team_size, 1);
        assert_eq!(project.stats.views, 12);
    }
}
