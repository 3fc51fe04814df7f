mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;
pub mod shared_repos;
pub mod startup;

pub use domain::{entities, fixtures, query, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, limiter, utils, web};

use auth::jwt::JwtService;
use limiter::rate_limiter::RateLimiterStore;
use shared_repos::SharedRepositories;
use use_cases::{
    blog::BlogPostHandler, contact::ContactHandler, project::ProjectHandler, seed::SeedHandler,
    users::UserHandler,
};

pub struct AppState {
    pub project_handler: ProjectHandler,
    pub blog_handler: BlogPostHandler,
    pub seed_handler: SeedHandler,
    pub user_handler: UserHandler,
    pub contact_handler: ContactHandler,
    pub jwt_service: JwtService,
    pub admin_emails: Vec<String>,
    pub trust_x_forwarded_for: bool,
    pub store_backend: &'static str,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, repos: SharedRepositories) -> Self {
        let admin_emails = config.admin_email_list();

        AppState {
            project_handler: ProjectHandler::new(repos.project_repo.clone()),
            blog_handler: BlogPostHandler::new(repos.blog_post_repo, repos.user_repo.clone()),
            seed_handler: SeedHandler::new(repos.project_repo, fixtures::project_fixtures()),
            user_handler: UserHandler::new(repos.user_repo, admin_emails.clone()),
            contact_handler: ContactHandler::new(
                repos.message_repo,
                RateLimiterStore::per_hour(config.contact_rate_limit_per_hour),
            ),
            jwt_service: JwtService::new(config),
            admin_emails,
            trust_x_forwarded_for: config.trust_x_forwarded_for,
            store_backend: repos.backend,
        }
    }
}
