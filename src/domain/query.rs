//! Typed list queries built from raw query-string parameters.
//!
//! Each store backend translates a [`PostQuery`] / [`ProjectQuery`] natively: the Postgres
//! repositories into SQL, the in-memory store through [`PostFilter::matches`] and
//! [`PostSort::compare`].

use std::{cmp::Ordering, str::FromStr};

use serde::Deserialize;

use crate::{
    entities::{
        blog_post::{BlogPost, PostStatus},
        project::{Project, ProjectCategory, ProjectStatus},
        schema::Difficulty,
    },
    errors::{AppError, FieldError},
};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// A like is worth this many views in the `trending` score.
pub const TRENDING_LIKE_WEIGHT: i64 = 10;

/// Sentinel accepted by every filter parameter meaning "do not filter".
const ALL: &str = "all";

// ───── Raw Parameters ───────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub status: Option<String>,
    pub featured: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    pub category: Option<String>,
    pub status: Option<String>,
    pub difficulty: Option<String>,
    pub featured: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

// ───── Typed Queries ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Non-numeric values fall back to the defaults; zero or negative values clamp to 1.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        PageRequest {
            page: parse_positive(page, DEFAULT_PAGE, u32::MAX),
            limit: parse_positive(limit, DEFAULT_LIMIT, MAX_LIMIT),
        }
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

fn parse_positive(raw: Option<&str>, default: u32, max: u32) -> u32 {
    match raw.map(str::trim).and_then(|v| v.parse::<i64>().ok()) {
        None => default,
        Some(n) if n <= 0 => 1,
        Some(n) => n.min(i64::from(max)) as u32,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostSort {
    #[default]
    Latest,
    Popular,
    Trending,
}

impl FromStr for PostSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(PostSort::Latest),
            "popular" => Ok(PostSort::Popular),
            "trending" => Ok(PostSort::Trending),
            other => Err(format!("unknown sort '{}' (expected latest, popular or trending)", other)),
        }
    }
}

impl PostSort {
    /// Total order used by the in-memory store. Mirrors the SQL `ORDER BY`.
    pub fn compare(&self, a: &BlogPost, b: &BlogPost) -> Ordering {
        let primary = match self {
            PostSort::Latest => b.published_at.cmp(&a.published_at),
            PostSort::Popular => b.views.cmp(&a.views),
            PostSort::Trending => trending_score(b).cmp(&trending_score(a)),
        };
        primary
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }
}

pub fn trending_score(post: &BlogPost) -> i64 {
    post.views
        .saturating_add(post.likes.saturating_mul(TRENDING_LIKE_WEIGHT))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    /// Case-insensitive substring of the post category.
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<PostStatus>,
    pub featured: Option<bool>,
    /// Case-insensitive substring of title, description, excerpt or any tag.
    pub search: Option<String>,
}

impl PostFilter {
    pub fn matches(&self, post: &BlogPost) -> bool {
        if let Some(category) = &self.category {
            if !contains_ignore_case(&post.category, category) {
                return false;
            }
        }
        if self.difficulty.is_some_and(|d| d != post.difficulty) {
            return false;
        }
        if self.status.is_some_and(|s| s != post.status) {
            return false;
        }
        if self.featured.is_some_and(|f| f != post.featured) {
            return false;
        }
        if let Some(term) = &self.search {
            let hit = contains_ignore_case(&post.title, term)
                || contains_ignore_case(&post.description, term)
                || contains_ignore_case(&post.excerpt, term)
                || post.tags.iter().any(|tag| contains_ignore_case(tag, term));
            if !hit {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostQuery {
    pub filter: PostFilter,
    pub sort: PostSort,
    pub page: PageRequest,
}

impl TryFrom<PostListParams> for PostQuery {
    type Error = AppError;

    /// Every invalid parameter is reported in the same error.
    fn try_from(params: PostListParams) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let category = non_empty(params.category.as_deref())
            .filter(|c| !c.eq_ignore_ascii_case(ALL))
            .map(str::to_string);

        let difficulty = parse_enum_filter::<Difficulty>("difficulty", params.difficulty.as_deref(), &mut errors);

        // An absent status means "published"; only an explicit `all` lifts the filter.
        let status = match non_empty(params.status.as_deref()) {
            None => Some(PostStatus::Published),
            Some(raw) => parse_enum_filter::<PostStatus>("status", Some(raw), &mut errors),
        };

        let featured = parse_featured(params.featured.as_deref(), &mut errors);

        let search = non_empty(params.search.as_deref()).map(str::to_string);

        let sort = match non_empty(params.sort.as_deref()) {
            None => PostSort::default(),
            Some(raw) => raw.parse().unwrap_or_else(|message| {
                errors.push(FieldError { field: "sort".into(), message });
                PostSort::default()
            }),
        };

        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        Ok(PostQuery {
            filter: PostFilter {
                category,
                difficulty,
                status,
                featured,
                search,
            },
            sort,
            page: PageRequest::parse(params.page.as_deref(), params.limit.as_deref()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,
    pub difficulty: Option<Difficulty>,
    pub featured: Option<bool>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        self.category.is_none_or(|c| c == project.category)
            && self.status.is_none_or(|s| s == project.status)
            && self.difficulty.is_none_or(|d| d == project.difficulty)
            && self.featured.is_none_or(|f| f == project.featured)
    }
}

/// Projects are always listed newest first; pagination only applies when asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectQuery {
    pub filter: ProjectFilter,
    pub page: Option<PageRequest>,
}

impl ProjectQuery {
    pub fn compare(a: &Project, b: &Project) -> Ordering {
        b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))
    }
}

impl TryFrom<ProjectListParams> for ProjectQuery {
    type Error = AppError;

    fn try_from(params: ProjectListParams) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let category = parse_enum_filter::<ProjectCategory>("category", params.category.as_deref(), &mut errors);
        let status = parse_enum_filter::<ProjectStatus>("status", params.status.as_deref(), &mut errors);
        let difficulty = parse_enum_filter::<Difficulty>("difficulty", params.difficulty.as_deref(), &mut errors);
        let featured = parse_featured(params.featured.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        let page = match (params.page.as_deref(), params.limit.as_deref()) {
            (None, None) => None,
            (page, limit) => Some(PageRequest::parse(page, limit)),
        };

        Ok(ProjectQuery {
            filter: ProjectFilter {
                category,
                status,
                difficulty,
                featured,
            },
            page,
        })
    }
}

// ───── Helpers ──────────────────────────────────────────────────────

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_enum_filter<T>(field: &str, raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<T>
where
    T: FromStr<Err = String>,
{
    let raw = non_empty(raw)?;
    if raw.eq_ignore_ascii_case(ALL) {
        return None;
    }
    match raw.to_ascii_lowercase().parse::<T>() {
        Ok(value) => Some(value),
        Err(message) => {
            errors.push(FieldError {
                field: field.to_string(),
                message,
            });
            None
        }
    }
}

fn parse_featured(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<bool> {
    match non_empty(raw)?.to_ascii_lowercase().as_str() {
        "featured" | "true" => Some(true),
        "false" => Some(false),
        ALL => None,
        other => {
            errors.push(FieldError {
                field: "featured".into(),
                message: format!("unknown featured value '{}' (expected featured, true, false or all)", other),
            });
            None
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Escapes `LIKE` wildcards so user input is matched literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::blog_post::NewBlogPostRequest;
    use uuid::Uuid;

    fn params(pairs: &[(&str, &str)]) -> PostListParams {
        let mut p = PostListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "category" => p.category = value,
                "difficulty" => p.difficulty = value,
                "status" => p.status = value,
                "featured" => p.featured = value,
                "search" => p.search = value,
                "sort" => p.sort = value,
                "page" => p.page = value,
                "limit" => p.limit = value,
                other => panic!("unknown param {}", other),
            }
        }
        p
    }

    fn post(title: &str, views: i64, likes: i64) -> BlogPost {
        BlogPost::from_request(NewBlogPostRequest {
            title: title.into(),
            slug: slug::slugify(title),
            description: "d".into(),
            excerpt: "e".into(),
            content: "<p>c</p>".into(),
            author: Uuid::new_v4(),
            read_time: "1 min read".into(),
            category: "Systems Programming".into(),
            tags: vec!["Rust".into(), "tokio".into()],
            image: "https://cdn.example.com/x.png".into(),
            views,
            likes,
            difficulty: Some(Difficulty::Beginner),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn absent_status_means_published_and_all_lifts_it() {
        let q = PostQuery::try_from(PostListParams::default()).unwrap();
        assert_eq!(q.filter.status, Some(PostStatus::Published));
        assert_eq!(q.sort, PostSort::Latest);
        assert_eq!(q.page, PageRequest::default());

        let q = PostQuery::try_from(params(&[("status", "all")])).unwrap();
        assert_eq!(q.filter.status, None);
    }

    #[test]
    fn invalid_parameters_are_reported_together() {
        let err = PostQuery::try_from(params(&[
            ("difficulty", "expert"),
            ("status", "pending"),
            ("sort", "random"),
            ("featured", "maybe"),
        ]))
        .unwrap_err();

        let AppError::ValidationError(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["difficulty", "status", "featured", "sort"]);
    }

    #[test]
    fn pagination_is_lenient() {
        assert_eq!(PageRequest::parse(Some("abc"), Some("xyz")), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::parse(Some("0"), Some("-5")), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::parse(Some("3"), Some("500")), PageRequest { page: 3, limit: 100 });
        assert_eq!(PageRequest { page: 3, limit: 10 }.skip(), 20);
    }

    #[test]
    fn featured_aliases() {
        let q = PostQuery::try_from(params(&[("featured", "featured")])).unwrap();
        assert_eq!(q.filter.featured, Some(true));
        let q = PostQuery::try_from(params(&[("featured", "false")])).unwrap();
        assert_eq!(q.filter.featured, Some(false));
        let q = PostQuery::try_from(params(&[("featured", "all"), ("category", "all")])).unwrap();
        assert_eq!(q.filter.featured, None);
        assert_eq!(q.filter.category, None);
    }

    #[test]
    fn search_and_category_are_case_insensitive_substrings() {
        let p = post("Zero-Copy Parsing", 0, 0);

        let filter = PostFilter {
            category: Some("systems".into()),
            search: Some("TOKIO".into()),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        let filter = PostFilter {
            search: Some("garbage".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn trending_weighs_likes() {
        let a = post("Post A", 100, 0);
        let b = post("Post B", 50, 10);
        let c = post("Post C", 10, 1);

        let mut posts = vec![c.clone(), a.clone(), b.clone()];
        posts.sort_by(|x, y| PostSort::Trending.compare(x, y));
        let order: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(order, vec!["Post B", "Post A", "Post C"]);

        posts.sort_by(|x, y| PostSort::Popular.compare(x, y));
        assert_eq!(posts[0].title, "Post A");
    }

    #[test]
    fn project_pagination_only_when_requested() {
        let q = ProjectQuery::try_from(ProjectListParams::default()).unwrap();
        assert_eq!(q.page, None);

        let q = ProjectQuery::try_from(ProjectListParams {
            limit: Some("5".into()),
            category: Some("ai".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(q.page, Some(PageRequest { page: 1, limit: 5 }));
        assert_eq!(q.filter.category, Some(ProjectCategory::Ai));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
    }
}
