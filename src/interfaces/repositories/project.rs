use async_trait::async_trait;
use sqlx::{postgres::PgRow, types::Json, PgPool, Postgres, QueryBuilder, Row};

use crate::{
    entities::{
        envelope::Paged,
        project::{Project, ProjectPerformance, ProjectStats},
    },
    errors::AppError,
    query::{ProjectFilter, ProjectQuery},
    repositories::sqlx_repo::{parse_column, SqlxProjectRepo},
};

pub const PROJECT_NOT_FOUND: &str = "Project not found";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list_projects(&self, query: &ProjectQuery) -> Result<Paged<Project>, AppError>;
    /// Looks a project up by slug, falling back to its id.
    async fn get_project(&self, key: &str) -> Result<Project, AppError>;
    async fn create_project(&self, project: &Project) -> Result<Project, AppError>;
    /// Overwrites every field except id, creation time and the view/like counters.
    async fn replace_project(&self, project: &Project) -> Result<Project, AppError>;
    async fn delete_project(&self, key: &str) -> Result<(), AppError>;
    async fn delete_all_projects(&self) -> Result<u64, AppError>;
    async fn count_projects(&self) -> Result<u64, AppError>;
    async fn increment_project_likes(&self, key: &str) -> Result<i64, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

const PROJECT_COLUMNS: &str = "id, slug, title, description, long_description, image, category, status, \
    difficulty, technologies, features, screenshots, challenges, solutions, tags, lessons_learned, \
    future_improvements, github_url, live_url, stats, performance, featured, created_at, updated_at";

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProjectFilter) {
    builder.push(" WHERE TRUE");
    if let Some(category) = filter.category {
        builder.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(difficulty) = filter.difficulty {
        builder.push(" AND difficulty = ").push_bind(difficulty.as_str());
    }
    if let Some(featured) = filter.featured {
        builder.push(" AND featured = ").push_bind(featured);
    }
}

fn row_to_project(row: PgRow) -> Result<Project, AppError> {
    let Json(stats): Json<ProjectStats> = row.try_get("stats")?;
    let Json(performance): Json<ProjectPerformance> = row.try_get("performance")?;

    Ok(Project {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        long_description: row.try_get("long_description")?,
        image: row.try_get("image")?,
        category: parse_column(&row, "category")?,
        status: parse_column(&row, "status")?,
        difficulty: parse_column(&row, "difficulty")?,
        technologies: row.try_get("technologies")?,
        features: row.try_get("features")?,
        screenshots: row.try_get("screenshots")?,
        challenges: row.try_get("challenges")?,
        solutions: row.try_get("solutions")?,
        tags: row.try_get("tags")?,
        lessons_learned: row.try_get("lessons_learned")?,
        future_improvements: row.try_get("future_improvements")?,
        github_url: row.try_get("github_url")?,
        live_url: row.try_get("live_url")?,
        stats,
        performance,
        featured: row.try_get("featured")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self, query: &ProjectQuery) -> Result<Paged<Project>, AppError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM projects");
        push_filter(&mut count, &query.filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut builder = QueryBuilder::new(format!("SELECT {} FROM projects", PROJECT_COLUMNS));
        push_filter(&mut builder, &query.filter);
        builder.push(" ORDER BY created_at DESC, id ASC");

        if let Some(page) = query.page {
            builder.push(" LIMIT ").push_bind(i64::from(page.limit));
            builder.push(" OFFSET ").push_bind(page.skip() as i64);
        }

        let items = builder
            .build()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(row_to_project)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paged {
            items,
            total: total as u64,
        })
    }

    async fn get_project(&self, key: &str) -> Result<Project, AppError> {
        // Slugs never look like UUIDs, so at most one row can match.
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE slug = $1 OR id::text = $1 LIMIT 1",
            PROJECT_COLUMNS
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.into()))?;

        row_to_project(row)
    }

    async fn create_project(&self, project: &Project) -> Result<Project, AppError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO projects ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    $18, $19, $20, $21, $22, $23, $24)
            RETURNING {}
            "#,
            PROJECT_COLUMNS, PROJECT_COLUMNS
        ))
        .bind(project.id)
        .bind(&project.slug)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.long_description)
        .bind(&project.image)
        .bind(project.category.as_str())
        .bind(project.status.as_str())
        .bind(project.difficulty.as_str())
        .bind(&project.technologies)
        .bind(&project.features)
        .bind(&project.screenshots)
        .bind(&project.challenges)
        .bind(&project.solutions)
        .bind(&project.tags)
        .bind(&project.lessons_learned)
        .bind(&project.future_improvements)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(Json(&project.stats))
        .bind(Json(&project.performance))
        .bind(project.featured)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row_to_project(row)
    }

    async fn replace_project(&self, project: &Project) -> Result<Project, AppError> {
        // Counters are merged back from the stored row so concurrent likes are not lost.
        let row = sqlx::query(&format!(
            r#"
            UPDATE projects SET
                slug = $2, title = $3, description = $4, long_description = $5, image = $6,
                category = $7, status = $8, difficulty = $9, technologies = $10, features = $11,
                screenshots = $12, challenges = $13, solutions = $14, tags = $15,
                lessons_learned = $16, future_improvements = $17, github_url = $18,
                live_url = $19,
                stats = $20::jsonb || jsonb_build_object(
                    'views', COALESCE(stats->'views', '0'::jsonb),
                    'likes', COALESCE(stats->'likes', '0'::jsonb)
                ),
                performance = $21, featured = $22, updated_at = $23
            WHERE id = $1
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(project.id)
        .bind(&project.slug)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.long_description)
        .bind(&project.image)
        .bind(project.category.as_str())
        .bind(project.status.as_str())
        .bind(project.difficulty.as_str())
        .bind(&project.technologies)
        .bind(&project.features)
        .bind(&project.screenshots)
        .bind(&project.challenges)
        .bind(&project.solutions)
        .bind(&project.tags)
        .bind(&project.lessons_learned)
        .bind(&project.future_improvements)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(Json(&project.stats))
        .bind(Json(&project.performance))
        .bind(project.featured)
        .bind(project.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.into()))?;

        row_to_project(row)
    }

    async fn delete_project(&self, key: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE slug = $1 OR id::text = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(PROJECT_NOT_FOUND.into()));
        }
        Ok(())
    }

    async fn delete_all_projects(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM projects").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn count_projects(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn increment_project_likes(&self, key: &str) -> Result<i64, AppError> {
        let likes: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE projects
            SET stats = jsonb_set(stats, '{likes}', to_jsonb(COALESCE((stats->>'likes')::bigint, 0) + 1))
            WHERE slug = $1 OR id::text = $1
            RETURNING (stats->>'likes')::bigint
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        likes.ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.into()))
    }
}
