pub mod entities;
pub mod fixtures;
pub mod query;
pub mod use_cases;
