//! Posts carrying a tag

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::posts::types::{with_tags, Post, PostRow, POST_COLUMNS, POST_FROM, POST_ORDER};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsByTagQuery {
    pub tag: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PostsByTagError {
    #[error("Tag '{0}' not found")]
    TagNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<Post>, PostsByTagError>> for PostsByTagQuery {}

impl crate::cqrs::middleware::Query for PostsByTagQuery {}

impl From<PostsByTagError> for AppError {
    fn from(err: PostsByTagError) -> Self {
        match err {
            PostsByTagError::TagNotFound(tag) => AppError::NotFound(format!("Tag '{tag}' not found")),
            PostsByTagError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: PostsByTagQuery) -> Result<Vec<Post>, PostsByTagError> {
    let tag_id: i64 = sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
        .bind(&query.tag)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| PostsByTagError::TagNotFound(query.tag.clone()))?;

    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} {POST_FROM} JOIN post_tags pt ON pt.post_id = p.id WHERE pt.tag_id = ? {POST_ORDER}"
    ))
    .bind(tag_id)
    .fetch_all(&pool)
    .await?;

    Ok(with_tags(&pool, rows).await?)
}
