//! List authors with their books

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::authors::types::{with_books, Author, AuthorRow};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAuthorsQuery {}

#[derive(Debug, thiserror::Error)]
pub enum ListAuthorsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<Author>, ListAuthorsError>> for ListAuthorsQuery {}

impl crate::cqrs::middleware::Query for ListAuthorsQuery {}

impl From<ListAuthorsError> for AppError {
    fn from(err: ListAuthorsError) -> Self {
        match err {
            ListAuthorsError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, _query: ListAuthorsQuery) -> Result<Vec<Author>, ListAuthorsError> {
    let rows = sqlx::query_as::<_, AuthorRow>("SELECT id, name FROM authors ORDER BY id")
        .fetch_all(&pool)
        .await?;
    Ok(with_books(&pool, rows).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::shared::test_helpers::{TestAuthor, TestBook};

    #[tokio::test]
    async fn test_books_are_nested_under_their_author() {
        let pool = create_memory_pool().await.unwrap();
        let one = TestAuthor::new("Author One").insert(&pool).await.unwrap();
        TestAuthor::new("Author Two").insert(&pool).await.unwrap();
        TestBook::new(&one, "Book A", 2000).insert(&pool).await.unwrap();
        TestBook::new(&one, "Book B", 2005).insert(&pool).await.unwrap();

        let authors = handle(pool, ListAuthorsQuery::default()).await.unwrap();
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].books.len(), 2);
        assert_eq!(authors[0].books[1].title, "Book B");
        assert!(authors[1].books.is_empty());
    }
}
