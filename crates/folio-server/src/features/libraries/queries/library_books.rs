//! Books held by the library with a given name

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::libraries::types::{LibraryBook, LIBRARY_BOOK_SELECT};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryBooksQuery {
    #[serde(default)]
    pub library: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LibraryBooksError {
    #[error("Library '{0}' not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<LibraryBook>, LibraryBooksError>> for LibraryBooksQuery {}

impl crate::cqrs::middleware::Query for LibraryBooksQuery {}

impl From<LibraryBooksError> for AppError {
    fn from(err: LibraryBooksError) -> Self {
        match err {
            LibraryBooksError::NotFound(name) => AppError::NotFound(format!("Library '{name}' not found")),
            LibraryBooksError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: LibraryBooksQuery) -> Result<Vec<LibraryBook>, LibraryBooksError> {
    let name = query.library.trim();
    let library_id: i64 = sqlx::query_scalar("SELECT id FROM libraries WHERE name = ?")
        .bind(name)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| LibraryBooksError::NotFound(name.to_string()))?;

    let books = sqlx::query_as::<_, LibraryBook>(&format!(
        "{LIBRARY_BOOK_SELECT} JOIN library_books lb ON lb.book_id = b.id WHERE lb.library_id = ? ORDER BY b.title, b.id"
    ))
    .bind(library_id)
    .fetch_all(&pool)
    .await?;
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn test_unknown_library_is_not_found() {
        let pool = create_memory_pool().await.unwrap();
        let result = handle(
            pool,
            LibraryBooksQuery {
                library: "Atlantis".into(),
            },
        )
        .await;
        assert!(matches!(result, Err(LibraryBooksError::NotFound(name)) if name == "Atlantis"));
    }
}
