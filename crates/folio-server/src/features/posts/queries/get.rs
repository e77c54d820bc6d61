//! Get a post with its comments

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::comments::types::comments_for_post;
use crate::features::posts::types::{fetch_post, PostDetail};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPostQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetPostError {
    #[error("Post {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<PostDetail, GetPostError>> for GetPostQuery {}

impl crate::cqrs::middleware::Query for GetPostQuery {}

impl From<GetPostError> for AppError {
    fn from(err: GetPostError) -> Self {
        match err {
            GetPostError::NotFound(id) => AppError::NotFound(format!("Post {id} not found")),
            GetPostError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetPostQuery) -> Result<PostDetail, GetPostError> {
    let post = fetch_post(&pool, query.id)
        .await?
        .ok_or(GetPostError::NotFound(query.id))?;
    let comments = comments_for_post(&pool, query.id).await?;
    Ok(PostDetail { post, comments })
}
