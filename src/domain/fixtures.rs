//! Sample projects the seed endpoint restores the catalogue to.

use crate::entities::{
    project::{NewProjectRequest, ProjectCategory, ProjectPerformance, ProjectStats, ProjectStatus},
    schema::Difficulty,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn project_fixtures() -> Vec<NewProjectRequest> {
    vec![
        NewProjectRequest {
            title: "Realtime Collaboration Board".into(),
            slug: "realtime-collaboration-board".into(),
            description: "Multiplayer whiteboard with presence, cursors and offline sync.".into(),
            long_description: "A canvas editor backed by CRDT documents. Clients sync over \
                WebSockets and fall back to local persistence when offline."
                .into(),
            image: "https://images.example.com/projects/collab-board.png".into(),
            category: ProjectCategory::Fullstack,
            status: ProjectStatus::Completed,
            difficulty: Difficulty::Advanced,
            technologies: strings(&["TypeScript", "React", "Rust", "WebSockets", "PostgreSQL"]),
            features: strings(&["Live cursors", "Offline mode", "Version history"]),
            challenges: strings(&["Conflict resolution across flaky connections"]),
            solutions: strings(&["CRDT based document model with periodic snapshots"]),
            tags: strings(&["realtime", "crdt", "collaboration"]),
            lessons_learned: strings(&["Design the sync protocol before the UI"]),
            future_improvements: strings(&["End-to-end encryption for boards"]),
            github_url: Some("https://github.com/example/collab-board".into()),
            live_url: Some("https://board.example.com".into()),
            stats: ProjectStats {
                completion_time: "4 months".into(),
                team_size: 3,
                complexity: 9,
                ..Default::default()
            },
            performance: ProjectPerformance {
                performance: 92,
                accessibility: 95,
                best_practices: 100,
                seo: 90,
            },
            featured: true,
            ..Default::default()
        },
        NewProjectRequest {
            title: "Portfolio Content API".into(),
            slug: "portfolio-content-api".into(),
            description: "JSON API serving projects and blog posts with filtering and pagination.".into(),
            long_description: "Actix-web service with typed query parsing, validation that \
                reports every failing field and atomic view counters."
                .into(),
            category: ProjectCategory::Backend,
            status: ProjectStatus::InProgress,
            difficulty: Difficulty::Intermediate,
            technologies: strings(&["Rust", "actix-web", "sqlx", "PostgreSQL"]),
            features: strings(&["Full-text-ish search", "Trending sort", "Admin dashboard endpoints"]),
            tags: strings(&["api", "rust"]),
            github_url: Some("https://github.com/example/portfolio-api".into()),
            stats: ProjectStats {
                completion_time: "6 weeks".into(),
                complexity: 6,
                ..Default::default()
            },
            performance: ProjectPerformance {
                performance: 99,
                accessibility: 100,
                best_practices: 100,
                seo: 100,
            },
            featured: true,
            ..Default::default()
        },
        NewProjectRequest {
            title: "Habit Tracker Mobile".into(),
            slug: "habit-tracker-mobile".into(),
            description: "Cross-platform habit tracker with streaks and reminders.".into(),
            image: "https://images.example.com/projects/habits.png".into(),
            category: ProjectCategory::Mobile,
            status: ProjectStatus::Completed,
            difficulty: Difficulty::Beginner,
            technologies: strings(&["Flutter", "SQLite"]),
            features: strings(&["Streaks", "Local notifications", "Charts"]),
            tags: strings(&["mobile", "productivity"]),
            live_url: Some("https://habits.example.com".into()),
            stats: ProjectStats {
                completion_time: "3 weeks".into(),
                complexity: 3,
                ..Default::default()
            },
            ..Default::default()
        },
        NewProjectRequest {
            title: "Code Review Assistant".into(),
            slug: "code-review-assistant".into(),
            description: "Summarises pull requests and flags risky changes before review.".into(),
            category: ProjectCategory::Ai,
            status: ProjectStatus::Planned,
            difficulty: Difficulty::Advanced,
            technologies: strings(&["Python", "FastAPI", "Embeddings"]),
            challenges: strings(&["Keeping prompts within context limits on large diffs"]),
            tags: strings(&["ai", "developer-tools"]),
            stats: ProjectStats {
                team_size: 2,
                complexity: 8,
                ..Default::default()
            },
            ..Default::default()
        },
        NewProjectRequest {
            title: "Design System Playground".into(),
            slug: "design-system-playground".into(),
            description: "Accessible component library with live theming.".into(),
            category: ProjectCategory::Frontend,
            status: ProjectStatus::Completed,
            technologies: strings(&["TypeScript", "Vue", "Storybook"]),
            features: strings(&["Theme editor", "Keyboard navigation audit"]),
            tags: strings(&["design-system", "a11y"]),
            github_url: Some("https://github.com/example/design-playground".into()),
            stats: ProjectStats {
                completion_time: "2 months".into(),
                complexity: 5,
                ..Default::default()
            },
            performance: ProjectPerformance {
                performance: 97,
                accessibility: 100,
                best_practices: 96,
                seo: 92,
            },
            ..Default::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::entities::project::Project;
    use validator::Validate;

    #[test]
    fn fixtures_are_valid_and_unique() {
        let fixtures = project_fixtures();
        let slugs: HashSet<_> = fixtures.iter().map(|f| f.slug.clone()).collect();
        assert_eq!(slugs.len(), fixtures.len());

        for fixture in fixtures {
            let slug = fixture.slug.clone();
            assert!(Project::from_request(fixture).validate().is_ok(), "fixture {} is invalid", slug);
        }
    }
}
