//! Publish a new post as the calling user

use chrono::Utc;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::posts::types::{
    fetch_post, normalize_tags, set_post_tags, validate_tags, Post, MAX_POST_TITLE_LENGTH,
};
use crate::features::shared::validation::{validate_name, validate_text, FieldErrors};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostCommand {
    #[serde(skip)]
    pub author_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreatePostError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Post {0} vanished after creation")]
    Missing(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Post, CreatePostError>> for CreatePostCommand {}

impl crate::cqrs::middleware::Command for CreatePostCommand {}

impl CreatePostCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check("title", validate_name(&self.title, MAX_POST_TITLE_LENGTH));
        errors.check("content", validate_text(&self.content));
        validate_tags(&mut errors, &normalize_tags(&self.tags));
        errors.into_result()
    }
}

impl From<CreatePostError> for AppError {
    fn from(err: CreatePostError) -> Self {
        match err {
            CreatePostError::Validation(fields) => AppError::validation(fields),
            CreatePostError::Missing(id) => AppError::Internal(format!("Post {id} vanished after creation")),
            CreatePostError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(author_id = command.author_id))]
pub async fn handle(pool: SqlitePool, command: CreatePostCommand) -> Result<Post, CreatePostError> {
    command.validate()?;
    let tags = normalize_tags(&command.tags);

    let mut tx = pool.begin().await?;
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO posts (title, content, published_date, author_id) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(command.title.trim())
    .bind(&command.content)
    .bind(Utc::now())
    .bind(command.author_id)
    .fetch_one(&mut *tx)
    .await?;
    set_post_tags(&mut tx, id, &tags).await?;
    tx.commit().await?;

    tracing::info!(post_id = id, tags = tags.len(), "Post published");

    fetch_post(&pool, id).await?.ok_or(CreatePostError::Missing(id))
}
