pub mod blog_post;
pub mod envelope;
pub mod message;
pub mod option_fields;
pub mod project;
pub mod schema;
pub mod seed;
pub mod token;
pub mod user;
