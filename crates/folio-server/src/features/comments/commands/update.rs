//! Edit a comment's text

use chrono::Utc;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::comments::types::{fetch_comment, Comment};
use crate::features::shared::validation::{validate_text, FieldErrors};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCommentCommand {
    #[serde(skip)]
    pub id: i64,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateCommentError {
    #[error("Comment {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Comment, UpdateCommentError>> for UpdateCommentCommand {}

impl crate::cqrs::middleware::Command for UpdateCommentCommand {}

impl UpdateCommentCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check("content", validate_text(&self.content));
        errors.into_result()
    }
}

impl From<UpdateCommentError> for AppError {
    fn from(err: UpdateCommentError) -> Self {
        match err {
            UpdateCommentError::NotFound(id) => AppError::NotFound(format!("Comment {id} not found")),
            UpdateCommentError::Validation(fields) => AppError::validation(fields),
            UpdateCommentError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(comment_id = command.id))]
pub async fn handle(pool: SqlitePool, command: UpdateCommentCommand) -> Result<Comment, UpdateCommentError> {
    command.validate()?;

    let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
        .bind(&command.content)
        .bind(Utc::now())
        .bind(command.id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(UpdateCommentError::NotFound(command.id));
    }

    tracing::info!(comment_id = command.id, "Comment updated");

    fetch_comment(&pool, command.id)
        .await?
        .ok_or(UpdateCommentError::NotFound(command.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::comments::commands::create::{self, CreateCommentCommand};
    use crate::features::shared::test_helpers::{TestPost, TestUser};

    #[tokio::test]
    async fn test_update_bumps_updated_at() {
        let pool = create_memory_pool().await.unwrap();
        let user = TestUser::new("writer").insert(&pool).await.unwrap();
        let post = TestPost::new(&user, "Hello").insert(&pool).await.unwrap();
        let comment = create::handle(
            pool.clone(),
            CreateCommentCommand {
                post_id: post.id,
                author_id: user.id,
                content: "First draft".into(),
            },
        )
        .await
        .unwrap();

        let updated = handle(
            pool,
            UpdateCommentCommand {
                id: comment.id,
                content: "Second draft".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.content, "Second draft");
        assert_eq!(updated.created_at, comment.created_at);
        assert!(updated.updated_at >= comment.updated_at);
    }
}
