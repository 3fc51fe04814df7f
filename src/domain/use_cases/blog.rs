use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;

use crate::{
    entities::{
        blog_post::{BlogPost, BlogPostPatch, BlogPostView, NewBlogPostRequest},
        envelope::Pagination,
        schema::validate_document,
        user::User,
    },
    errors::AppError,
    query::{PostListParams, PostQuery},
    repositories::{blog_post::BlogPostRepository, user::UserRepository},
    utils::valid_uuid::valid_uuid,
};

pub struct BlogPostHandler {
    pub blog_post_repo: Arc<dyn BlogPostRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl BlogPostHandler {
    pub fn new(blog_post_repo: Arc<dyn BlogPostRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        BlogPostHandler {
            blog_post_repo,
            user_repo,
        }
    }

    /// Filtered, sorted and paginated listing with authors resolved in a single lookup
    pub async fn list_blog_posts(
        &self,
        params: PostListParams,
    ) -> Result<(Vec<BlogPostView>, Pagination), AppError> {
        let query = PostQuery::try_from(params)?;
        let paged = self.blog_post_repo.list_blog_posts(&query).await?;

        let pagination = Pagination::new(query.page.page, query.page.limit, paged.total);
        let views = self.join_authors(paged.items).await?;

        Ok((views, pagination))
    }

    /// Retrieves a blog post by its ID. Reading a published post counts as a view.
    pub async fn get_blog_post_by_id(&self, post_id: &str) -> Result<BlogPostView, AppError> {
        let valid_id = valid_uuid(post_id, "id")?;
        let mut post = self.blog_post_repo.get_blog_post_by_id(&valid_id).await?;

        if post.is_published() {
            if let Some(views) = self.blog_post_repo.record_blog_post_view(&valid_id).await? {
                post.views = views;
            }
        }

        self.with_author(post).await
    }

    pub async fn create_blog_post(&self, request: NewBlogPostRequest) -> Result<BlogPostView, AppError> {
        let post = BlogPost::from_request(request)?;
        let created = self.blog_post_repo.create_blog_post(&post).await?;

        self.with_author(created).await
    }

    pub async fn replace_blog_post(
        &self,
        post_id: &str,
        request: NewBlogPostRequest,
    ) -> Result<BlogPostView, AppError> {
        let valid_id = valid_uuid(post_id, "id")?;
        let existing = self.blog_post_repo.get_blog_post_by_id(&valid_id).await?;

        let replacement = existing.replaced_by(request)?;
        let stored = self.blog_post_repo.replace_blog_post(&replacement).await?;

        self.with_author(stored).await
    }

    pub async fn patch_blog_post(&self, post_id: &str, patch: BlogPostPatch) -> Result<BlogPostView, AppError> {
        let valid_id = valid_uuid(post_id, "id")?;
        let mut post = self.blog_post_repo.get_blog_post_by_id(&valid_id).await?;

        post.apply_patch(patch);
        validate_document(&post, Vec::new())?;

        let stored = self.blog_post_repo.replace_blog_post(&post).await?;
        self.with_author(stored).await
    }

    /// Deletes a blog post by its ID
    pub async fn delete_blog_post(&self, post_id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(post_id, "id")?;
        self.blog_post_repo.delete_blog_post(&valid_id).await
    }

    pub async fn like_blog_post(&self, post_id: &str) -> Result<i64, AppError> {
        let valid_id = valid_uuid(post_id, "id")?;
        self.blog_post_repo.increment_blog_post_likes(&valid_id).await
    }

    async fn with_author(&self, post: BlogPost) -> Result<BlogPostView, AppError> {
        let author = self.user_repo.get_user_by_id(&post.author).await?;
        Ok(BlogPostView::new(post, author.as_ref()))
    }

    async fn join_authors(&self, posts: Vec<BlogPost>) -> Result<Vec<BlogPostView>, AppError> {
        let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<Uuid, User> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            self.user_repo
                .get_users_by_ids(&author_ids)
                .await?
                .into_iter()
                .map(|user| (user.id, user))
                .collect()
        };

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author);
                BlogPostView::new(post, author)
            })
            .collect())
    }
}
