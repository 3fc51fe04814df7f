use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::{
    entities::{blog_post::BlogPost, envelope::Paged},
    errors::AppError,
    query::{escape_like, PostFilter, PostQuery, PostSort, TRENDING_LIKE_WEIGHT},
    repositories::sqlx_repo::{parse_column, SqlxBlogPostRepo},
};

pub const BLOG_POST_NOT_FOUND: &str = "Blog post not found";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogPostRepository: Sync + Send {
    async fn list_blog_posts(&self, query: &PostQuery) -> Result<Paged<BlogPost>, AppError>;
    async fn get_blog_post_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError>;
    async fn create_blog_post(&self, post: &BlogPost) -> Result<BlogPost, AppError>;
    /// Overwrites every field except id, creation time and the view/like counters.
    async fn replace_blog_post(&self, post: &BlogPost) -> Result<BlogPost, AppError>;
    async fn delete_blog_post(&self, id: &Uuid) -> Result<(), AppError>;
    /// Atomically bumps `views` of a published post. `None` when the post is not published.
    async fn record_blog_post_view(&self, id: &Uuid) -> Result<Option<i64>, AppError>;
    async fn increment_blog_post_likes(&self, id: &Uuid) -> Result<i64, AppError>;
}

impl SqlxBlogPostRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBlogPostRepo { pool }
    }
}

const BLOG_POST_COLUMNS: &str = "id, slug, title, description, excerpt, content, author, published_at, \
    read_time, category, tags, image, views, likes, featured, status, difficulty, created_at, updated_at";

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    builder.push(" WHERE TRUE");

    if let Some(category) = &filter.category {
        builder
            .push(" AND category ILIKE ")
            .push_bind(format!("%{}%", escape_like(category)));
    }
    if let Some(difficulty) = filter.difficulty {
        builder.push(" AND difficulty = ").push_bind(difficulty.as_str());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(featured) = filter.featured {
        builder.push(" AND featured = ").push_bind(featured);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        builder.push(" AND (title ILIKE ").push_bind(pattern.clone());
        builder.push(" OR description ILIKE ").push_bind(pattern.clone());
        builder.push(" OR excerpt ILIKE ").push_bind(pattern.clone());
        builder
            .push(" OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE ")
            .push_bind(pattern)
            .push("))");
    }
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, sort: PostSort) {
    match sort {
        PostSort::Latest => builder.push(" ORDER BY published_at DESC"),
        PostSort::Popular => builder.push(" ORDER BY views DESC"),
        PostSort::Trending => builder.push(format!(
            " ORDER BY (views + likes * {}) DESC",
            TRENDING_LIKE_WEIGHT
        )),
    };
    builder.push(", created_at DESC, id ASC");
}

fn row_to_blog_post(row: PgRow) -> Result<BlogPost, AppError> {
    Ok(BlogPost {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        excerpt: row.try_get("excerpt")?,
        content: row.try_get("content")?,
        author: row.try_get("author")?,
        published_at: row.try_get("published_at")?,
        read_time: row.try_get("read_time")?,
        category: row.try_get("category")?,
        tags: row.try_get("tags")?,
        image: row.try_get("image")?,
        views: row.try_get("views")?,
        likes: row.try_get("likes")?,
        featured: row.try_get("featured")?,
        status: parse_column(&row, "status")?,
        difficulty: parse_column(&row, "difficulty")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepo {
    async fn list_blog_posts(&self, query: &PostQuery) -> Result<Paged<BlogPost>, AppError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM blog_posts");
        push_filter(&mut count, &query.filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut builder = QueryBuilder::new(format!("SELECT {} FROM blog_posts", BLOG_POST_COLUMNS));
        push_filter(&mut builder, &query.filter);
        push_order(&mut builder, query.sort);
        builder.push(" LIMIT ").push_bind(i64::from(query.page.limit));
        builder.push(" OFFSET ").push_bind(query.page.skip() as i64);

        let items = builder
            .build()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(row_to_blog_post)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paged {
            items,
            total: total as u64,
        })
    }

    async fn get_blog_post_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM blog_posts WHERE id = $1", BLOG_POST_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(BLOG_POST_NOT_FOUND.into()))?;

        row_to_blog_post(row)
    }

    async fn create_blog_post(&self, post: &BlogPost) -> Result<BlogPost, AppError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO blog_posts ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {}
            "#,
            BLOG_POST_COLUMNS, BLOG_POST_COLUMNS
        ))
        .bind(post.id)
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(post.author)
        .bind(post.published_at)
        .bind(&post.read_time)
        .bind(&post.category)
        .bind(&post.tags)
        .bind(&post.image)
        .bind(post.views)
        .bind(post.likes)
        .bind(post.featured)
        .bind(post.status.as_str())
        .bind(post.difficulty.as_str())
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row_to_blog_post(row)
    }

    async fn replace_blog_post(&self, post: &BlogPost) -> Result<BlogPost, AppError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE blog_posts SET
                slug = $2, title = $3, description = $4, excerpt = $5, content = $6, author = $7,
                published_at = $8, read_time = $9, category = $10, tags = $11, image = $12,
                featured = $13, status = $14, difficulty = $15, updated_at = $16
            WHERE id = $1
            RETURNING {}
            "#,
            BLOG_POST_COLUMNS
        ))
        .bind(post.id)
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(post.author)
        .bind(post.published_at)
        .bind(&post.read_time)
        .bind(&post.category)
        .bind(&post.tags)
        .bind(&post.image)
        .bind(post.featured)
        .bind(post.status.as_str())
        .bind(post.difficulty.as_str())
        .bind(post.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(BLOG_POST_NOT_FOUND.into()))?;

        row_to_blog_post(row)
    }

    async fn delete_blog_post(&self, id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| {
                if result.rows_affected() == 0 {
                    Err(AppError::NotFound(BLOG_POST_NOT_FOUND.into()))
                } else {
                    Ok(())
                }
            })?
    }

    async fn record_blog_post_view(&self, id: &Uuid) -> Result<Option<i64>, AppError> {
        let views: Option<i64> = sqlx::query_scalar(
            "UPDATE blog_posts SET views = views + 1 WHERE id = $1 AND status = 'published' RETURNING views",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(views)
    }

    async fn increment_blog_post_likes(&self, id: &Uuid) -> Result<i64, AppError> {
        let likes: Option<i64> = sqlx::query_scalar("UPDATE blog_posts SET likes = likes + 1 WHERE id = $1 RETURNING likes")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        likes.ok_or_else(|| AppError::NotFound(BLOG_POST_NOT_FOUND.into()))
    }
}
