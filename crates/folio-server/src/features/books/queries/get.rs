//! Get a single book

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::books::types::{fetch_book, Book};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBookQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetBookError {
    #[error("Book {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Book, GetBookError>> for GetBookQuery {}

impl crate::cqrs::middleware::Query for GetBookQuery {}

impl From<GetBookError> for AppError {
    fn from(err: GetBookError) -> Self {
        match err {
            GetBookError::NotFound(id) => AppError::NotFound(format!("Book {id} not found")),
            GetBookError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetBookQuery) -> Result<Book, GetBookError> {
    fetch_book(&pool, query.id)
        .await?
        .ok_or(GetBookError::NotFound(query.id))
}
