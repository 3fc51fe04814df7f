pub mod blog;
pub mod contact;
pub mod extractors;
pub mod project;
pub mod seed;
pub mod users;
