//! Delete a comment

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommentCommand {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteCommentError {
    #[error("Comment {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<(), DeleteCommentError>> for DeleteCommentCommand {}

impl crate::cqrs::middleware::Command for DeleteCommentCommand {}

impl From<DeleteCommentError> for AppError {
    fn from(err: DeleteCommentError) -> Self {
        match err {
            DeleteCommentError::NotFound(id) => AppError::NotFound(format!("Comment {id} not found")),
            DeleteCommentError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, command: DeleteCommentCommand) -> Result<(), DeleteCommentError> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteCommentError::NotFound(command.id));
    }

    tracing::info!(comment_id = command.id, "Comment deleted");
    Ok(())
}
