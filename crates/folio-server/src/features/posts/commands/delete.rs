//! Delete a post along with its comments and tag links

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePostCommand {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeletePostError {
    #[error("Post {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<(), DeletePostError>> for DeletePostCommand {}

impl crate::cqrs::middleware::Command for DeletePostCommand {}

impl From<DeletePostError> for AppError {
    fn from(err: DeletePostError) -> Self {
        match err {
            DeletePostError::NotFound(id) => AppError::NotFound(format!("Post {id} not found")),
            DeletePostError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, command: DeletePostCommand) -> Result<(), DeletePostError> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeletePostError::NotFound(command.id));
    }

    tracing::info!(post_id = command.id, "Post deleted");
    Ok(())
}
