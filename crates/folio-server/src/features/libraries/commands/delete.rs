//! Delete a library (its book links and librarian go with it)

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteLibraryCommand {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteLibraryError {
    #[error("Library {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<(), DeleteLibraryError>> for DeleteLibraryCommand {}

impl crate::cqrs::middleware::Command for DeleteLibraryCommand {}

impl From<DeleteLibraryError> for AppError {
    fn from(err: DeleteLibraryError) -> Self {
        match err {
            DeleteLibraryError::NotFound(id) => AppError::NotFound(format!("Library {id} not found")),
            DeleteLibraryError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, command: DeleteLibraryCommand) -> Result<(), DeleteLibraryError> {
    let result = sqlx::query("DELETE FROM libraries WHERE id = ?")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteLibraryError::NotFound(command.id));
    }

    tracing::info!(library_id = command.id, "Library deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn test_delete_removes_librarian() {
        let pool = create_memory_pool().await.unwrap();
        let id: i64 = sqlx::query_scalar("INSERT INTO libraries (name) VALUES ('Branch') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO librarians (name, library_id) VALUES ('Ann', ?)")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();

        handle(pool.clone(), DeleteLibraryCommand { id }).await.unwrap();

        let librarians: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM librarians")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(librarians, 0);
        assert!(matches!(
            handle(pool, DeleteLibraryCommand { id }).await,
            Err(DeleteLibraryError::NotFound(_))
        ));
    }
}
