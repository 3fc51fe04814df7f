pub mod blog_posts;
pub mod contact;
pub mod home;
pub mod json_error;
pub mod projects;
pub mod seed;
pub mod system;
pub mod users;
