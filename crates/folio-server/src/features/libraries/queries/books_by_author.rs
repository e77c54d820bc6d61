//! Books written by the author with a given name

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::libraries::types::{LibraryBook, LIBRARY_BOOK_SELECT};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BooksByAuthorQuery {
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BooksByAuthorError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<LibraryBook>, BooksByAuthorError>> for BooksByAuthorQuery {}

impl crate::cqrs::middleware::Query for BooksByAuthorQuery {}

impl From<BooksByAuthorError> for AppError {
    fn from(err: BooksByAuthorError) -> Self {
        match err {
            BooksByAuthorError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: BooksByAuthorQuery) -> Result<Vec<LibraryBook>, BooksByAuthorError> {
    let books = sqlx::query_as::<_, LibraryBook>(&format!(
        "{LIBRARY_BOOK_SELECT} WHERE a.name = ? ORDER BY b.title, b.id"
    ))
    .bind(query.author.trim())
    .fetch_all(&pool)
    .await?;
    Ok(books)
}
