//! In-process document store selected with `database_url = "memory://"`.
//!
//! Each collection sits behind its own `RwLock`; uniqueness checks and counter increments
//! happen under the write lock so they are atomic with respect to other requests.

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    entities::{
        blog_post::BlogPost, envelope::Paged, message::Message, project::Project, user::User,
    },
    errors::AppError,
    query::{PostQuery, ProjectQuery},
    repositories::{
        blog_post::{BlogPostRepository, BLOG_POST_NOT_FOUND},
        message::{MessageRepository, MESSAGE_NOT_FOUND},
        project::{ProjectRepository, PROJECT_NOT_FOUND},
        user::{UserRepository, USER_NOT_FOUND},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    projects: RwLock<Vec<Project>>,
    posts: RwLock<Vec<BlogPost>>,
    users: RwLock<Vec<User>>,
    messages: RwLock<Vec<Message>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn project_matches_key(project: &Project, key: &str) -> bool {
    project.slug == key || project.id.to_string() == key
}

fn duplicate_slug() -> AppError {
    AppError::DuplicateKey("slug already exists".into())
}

fn page_of<T: Clone>(items: &[T], skip: u64, limit: u64) -> Vec<T> {
    items
        .iter()
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn list_projects(&self, query: &ProjectQuery) -> Result<Paged<Project>, AppError> {
        let mut matching: Vec<Project> = self
            .projects
            .read()
            .iter()
            .filter(|p| query.filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(ProjectQuery::compare);

        let total = matching.len() as u64;
        let items = match query.page {
            Some(page) => page_of(&matching, page.skip(), u64::from(page.limit)),
            None => matching,
        };
        Ok(Paged { items, total })
    }

    async fn get_project(&self, key: &str) -> Result<Project, AppError> {
        self.projects
            .read()
            .iter()
            .find(|p| project_matches_key(p, key))
            .cloned()
            .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.into()))
    }

    async fn create_project(&self, project: &Project) -> Result<Project, AppError> {
        let mut projects = self.projects.write();
        if projects.iter().any(|p| p.slug == project.slug) {
            return Err(duplicate_slug());
        }
        projects.push(project.clone());
        Ok(project.clone())
    }

    async fn replace_project(&self, project: &Project) -> Result<Project, AppError> {
        let mut projects = self.projects.write();
        if projects.iter().any(|p| p.slug == project.slug && p.id != project.id) {
            return Err(duplicate_slug());
        }

        let stored = projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.into()))?;

        let (views, likes) = (stored.stats.views, stored.stats.likes);
        let created_at = stored.created_at;
        *stored = project.clone();
        stored.stats.views = views;
        stored.stats.likes = likes;
        stored.created_at = created_at;
        Ok(stored.clone())
    }

    async fn delete_project(&self, key: &str) -> Result<(), AppError> {
        let mut projects = self.projects.write();
        let before = projects.len();
        projects.retain(|p| !project_matches_key(p, key));

        if projects.len() == before {
            return Err(AppError::NotFound(PROJECT_NOT_FOUND.into()));
        }
        Ok(())
    }

    async fn delete_all_projects(&self) -> Result<u64, AppError> {
        let mut projects = self.projects.write();
        let removed = projects.len() as u64;
        projects.clear();
        Ok(removed)
    }

    async fn count_projects(&self) -> Result<u64, AppError> {
        Ok(self.projects.read().len() as u64)
    }

    async fn increment_project_likes(&self, key: &str) -> Result<i64, AppError> {
        let mut projects = self.projects.write();
        let project = projects
            .iter_mut()
            .find(|p| project_matches_key(p, key))
            .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.into()))?;

        project.stats.likes += 1;
        Ok(project.stats.likes)
    }
}

#[async_trait]
impl BlogPostRepository for MemoryStore {
    async fn list_blog_posts(&self, query: &PostQuery) -> Result<Paged<BlogPost>, AppError> {
        let mut matching: Vec<BlogPost> = self
            .posts
            .read()
            .iter()
            .filter(|p| query.filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| query.sort.compare(a, b));

        let total = matching.len() as u64;
        let items = page_of(&matching, query.page.skip(), u64::from(query.page.limit));
        Ok(Paged { items, total })
    }

    async fn get_blog_post_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError> {
        self.posts
            .read()
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(BLOG_POST_NOT_FOUND.into()))
    }

    async fn create_blog_post(&self, post: &BlogPost) -> Result<BlogPost, AppError> {
        let mut posts = self.posts.write();
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(duplicate_slug());
        }
        posts.push(post.clone());
        Ok(post.clone())
    }

    async fn replace_blog_post(&self, post: &BlogPost) -> Result<BlogPost, AppError> {
        let mut posts = self.posts.write();
        if posts.iter().any(|p| p.slug == post.slug && p.id != post.id) {
            return Err(duplicate_slug());
        }

        let stored = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or_else(|| AppError::NotFound(BLOG_POST_NOT_FOUND.into()))?;

        let (views, likes, created_at) = (stored.views, stored.likes, stored.created_at);
        *stored = post.clone();
        stored.views = views;
        stored.likes = likes;
        stored.created_at = created_at;
        Ok(stored.clone())
    }

    async fn delete_blog_post(&self, id: &Uuid) -> Result<(), AppError> {
        let mut posts = self.posts.write();
        let before = posts.len();
        posts.retain(|p| p.id != *id);

        if posts.len() == before {
            return Err(AppError::NotFound(BLOG_POST_NOT_FOUND.into()));
        }
        Ok(())
    }

    async fn record_blog_post_view(&self, id: &Uuid) -> Result<Option<i64>, AppError> {
        let mut posts = self.posts.write();
        Ok(posts
            .iter_mut()
            .find(|p| p.id == *id && p.is_published())
            .map(|post| {
                post.views += 1;
                post.views
            }))
    }

    async fn increment_blog_post_likes(&self, id: &Uuid) -> Result<i64, AppError> {
        let mut posts = self.posts.write();
        let post = posts
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| AppError::NotFound(BLOG_POST_NOT_FOUND.into()))?;

        post.likes += 1;
        Ok(post.likes)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateKey("email already exists".into()));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().iter().find(|u| u.id == *id).cloned())
    }

    async fn get_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        Ok(self
            .users
            .read()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let mut users = self.users.read().clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn delete_user(&self, id: &Uuid) -> Result<(), AppError> {
        let mut users = self.users.write();
        let before = users.len();
        users.retain(|u| u.id != *id);

        if users.len() == before {
            return Err(AppError::NotFound(USER_NOT_FOUND.into()));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create_message(&self, message: &Message) -> Result<Message, AppError> {
        self.messages.write().push(message.clone());
        Ok(message.clone())
    }

    async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        let mut messages = self.messages.read().clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn set_message_read(&self, id: &Uuid, read: bool) -> Result<Message, AppError> {
        let mut messages = self.messages.write();
        let message = messages
            .iter_mut()
            .find(|m| m.id == *id)
            .ok_or_else(|| AppError::NotFound(MESSAGE_NOT_FOUND.into()))?;

        message.read = read;
        Ok(message.clone())
    }

    async fn delete_message(&self, id: &Uuid) -> Result<(), AppError> {
        let mut messages = self.messages.write();
        let before = messages.len();
        messages.retain(|m| m.id != *id);

        if messages.len() == before {
            return Err(AppError::NotFound(MESSAGE_NOT_FOUND.into()));
        }
        Ok(())
    }
}
