use std::str::FromStr;

use sqlx::{postgres::PgRow, PgPool, Row};

use crate::errors::AppError;

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxBlogPostRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxMessageRepo {
    pub pool: PgPool,
}

/// Reads a TEXT column holding one of our enum spellings.
pub fn parse_column<T>(row: &PgRow, column: &str) -> Result<T, AppError>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|e| AppError::InternalError(format!("column '{}': {}", column, e)))
}
