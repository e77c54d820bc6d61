//! List bookshelf entries ordered by title

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::bookshelf::types::{ShelfBook, SHELF_BOOK_SELECT};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListShelfBooksQuery {}

#[derive(Debug, thiserror::Error)]
pub enum ListShelfBooksError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<ShelfBook>, ListShelfBooksError>> for ListShelfBooksQuery {}

impl crate::cqrs::middleware::Query for ListShelfBooksQuery {}

impl From<ListShelfBooksError> for AppError {
    fn from(err: ListShelfBooksError) -> Self {
        match err {
            ListShelfBooksError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: ListShelfBooksQuery,
) -> Result<Vec<ShelfBook>, ListShelfBooksError> {
    let books = sqlx::query_as::<_, ShelfBook>(&format!("{SHELF_BOOK_SELECT} ORDER BY title, id"))
        .fetch_all(&pool)
        .await?;
    Ok(books)
}
