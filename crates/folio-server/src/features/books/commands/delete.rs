//! Delete book command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBookCommand {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteBookError {
    #[error("Book {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<(), DeleteBookError>> for DeleteBookCommand {}

impl crate::cqrs::middleware::Command for DeleteBookCommand {}

impl From<DeleteBookError> for AppError {
    fn from(err: DeleteBookError) -> Self {
        match err {
            DeleteBookError::NotFound(id) => AppError::NotFound(format!("Book {id} not found")),
            DeleteBookError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, command: DeleteBookCommand) -> Result<(), DeleteBookError> {
    let result = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteBookError::NotFound(command.id));
    }

    tracing::info!(book_id = command.id, "Book deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::shared::test_helpers::{TestAuthor, TestBook};

    #[tokio::test]
    async fn test_delete_removes_library_links() {
        let pool = create_memory_pool().await.unwrap();
        let author = TestAuthor::new("Author").insert(&pool).await.unwrap();
        let book = TestBook::new(&author, "Gone", 1999).insert(&pool).await.unwrap();
        sqlx::query("INSERT INTO libraries (name) VALUES ('Branch')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO library_books (library_id, book_id) SELECT id, ? FROM libraries")
            .bind(book.id)
            .execute(&pool)
            .await
            .unwrap();

        handle(pool.clone(), DeleteBookCommand { id: book.id }).await.unwrap();

        let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM library_books")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(links, 0);

        assert!(matches!(
            handle(pool, DeleteBookCommand { id: book.id }).await,
            Err(DeleteBookError::NotFound(_))
        ));
    }
}
