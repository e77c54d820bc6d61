//! Delete a bookshelf entry

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteShelfBookCommand {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteShelfBookError {
    #[error("Book {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<(), DeleteShelfBookError>> for DeleteShelfBookCommand {}

impl crate::cqrs::middleware::Command for DeleteShelfBookCommand {}

impl From<DeleteShelfBookError> for AppError {
    fn from(err: DeleteShelfBookError) -> Self {
        match err {
            DeleteShelfBookError::NotFound(id) => AppError::NotFound(format!("Book {id} not found")),
            DeleteShelfBookError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, command: DeleteShelfBookCommand) -> Result<(), DeleteShelfBookError> {
    let result = sqlx::query("DELETE FROM shelf_books WHERE id = ?")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteShelfBookError::NotFound(command.id));
    }

    tracing::info!(shelf_book_id = command.id, "Bookshelf entry deleted");
    Ok(())
}
