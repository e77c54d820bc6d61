//! Delete author command; the author's books go with it

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAuthorCommand {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteAuthorError {
    #[error("Author {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<(), DeleteAuthorError>> for DeleteAuthorCommand {}

impl crate::cqrs::middleware::Command for DeleteAuthorCommand {}

impl From<DeleteAuthorError> for AppError {
    fn from(err: DeleteAuthorError) -> Self {
        match err {
            DeleteAuthorError::NotFound(id) => AppError::NotFound(format!("Author {id} not found")),
            DeleteAuthorError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, command: DeleteAuthorCommand) -> Result<(), DeleteAuthorError> {
    let result = sqlx::query("DELETE FROM authors WHERE id = ?")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteAuthorError::NotFound(command.id));
    }

    tracing::info!(author_id = command.id, "Author deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::shared::test_helpers::{TestAuthor, TestBook};

    #[tokio::test]
    async fn test_delete_cascades_to_books() {
        let pool = create_memory_pool().await.unwrap();
        let author = TestAuthor::new("Prolific").insert(&pool).await.unwrap();
        TestBook::new(&author, "One", 2001).insert(&pool).await.unwrap();
        TestBook::new(&author, "Two", 2002).insert(&pool).await.unwrap();

        handle(pool.clone(), DeleteAuthorCommand { id: author.id }).await.unwrap();

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(books, 0);
    }
}
