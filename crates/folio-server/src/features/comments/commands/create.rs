//! Comment on a post as the calling user

use chrono::Utc;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::comments::types::{fetch_comment, Comment};
use crate::features::shared::error_helpers::map_foreign_key_violation;
use crate::features::shared::validation::{validate_text, FieldErrors};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommentCommand {
    #[serde(skip)]
    pub post_id: i64,
    #[serde(skip)]
    pub author_id: i64,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateCommentError {
    #[error("Post {0} not found")]
    PostNotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Comment {0} vanished after creation")]
    Missing(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Comment, CreateCommentError>> for CreateCommentCommand {}

impl crate::cqrs::middleware::Command for CreateCommentCommand {}

impl CreateCommentCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check("content", validate_text(&self.content));
        errors.into_result()
    }
}

impl From<CreateCommentError> for AppError {
    fn from(err: CreateCommentError) -> Self {
        match err {
            CreateCommentError::PostNotFound(id) => AppError::NotFound(format!("Post {id} not found")),
            CreateCommentError::Validation(fields) => AppError::validation(fields),
            CreateCommentError::Missing(id) => {
                AppError::Internal(format!("Comment {id} vanished after creation"))
            },
            CreateCommentError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(post_id = command.post_id, author_id = command.author_id))]
pub async fn handle(pool: SqlitePool, command: CreateCommentCommand) -> Result<Comment, CreateCommentError> {
    command.validate()?;

    let now = Utc::now();
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO comments (post_id, author_id, content, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(command.post_id)
    .bind(command.author_id)
    .bind(&command.content)
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await
    .map_err(|e| map_foreign_key_violation(e, CreateCommentError::PostNotFound(command.post_id), Into::into))?;

    tracing::info!(comment_id = id, "Comment added");

    fetch_comment(&pool, id).await?.ok_or(CreateCommentError::Missing(id))
}
