use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    db::{
        memory::MemoryStore,
        postgres::{create_pool, run_migrations},
    },
    repositories::{
        blog_post::BlogPostRepository,
        message::MessageRepository,
        project::ProjectRepository,
        sqlx_repo::{SqlxBlogPostRepo, SqlxMessageRepo, SqlxProjectRepo, SqlxUserRepo},
        user::UserRepository,
    },
    settings::AppConfig,
};

/// One handle per collection, all backed by the same store.
#[derive(Clone)]
pub struct SharedRepositories {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub blog_post_repo: Arc<dyn BlogPostRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub message_repo: Arc<dyn MessageRepository>,
    pub backend: &'static str,
}

impl SharedRepositories {
    pub fn new(pool: PgPool) -> Self {
        SharedRepositories {
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            blog_post_repo: Arc::new(SqlxBlogPostRepo::new(pool.clone())),
            user_repo: Arc::new(SqlxUserRepo::new(pool.clone())),
            message_repo: Arc::new(SqlxMessageRepo::new(pool)),
            backend: "postgres",
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());

        SharedRepositories {
            project_repo: store.clone(),
            blog_post_repo: store.clone(),
            user_repo: store.clone(),
            message_repo: store,
            backend: "memory",
        }
    }

    /// Picks the backend named by `database_url`. Postgres gets its migrations applied first.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        if config.uses_memory_store() {
            tracing::warn!("Using the in-process store; data is lost on restart");
            return Ok(Self::in_memory());
        }

        let pool = create_pool(config).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }
}
