pub mod blog_post;
pub mod message;
pub mod project;
pub mod sqlx_repo;
pub mod user;
