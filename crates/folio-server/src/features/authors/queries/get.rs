//! Get a single author with their books

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::authors::types::{fetch_author, Author};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAuthorQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetAuthorError {
    #[error("Author {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Author, GetAuthorError>> for GetAuthorQuery {}

impl crate::cqrs::middleware::Query for GetAuthorQuery {}

impl From<GetAuthorError> for AppError {
    fn from(err: GetAuthorError) -> Self {
        match err {
            GetAuthorError::NotFound(id) => AppError::NotFound(format!("Author {id} not found")),
            GetAuthorError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetAuthorQuery) -> Result<Author, GetAuthorError> {
    fetch_author(&pool, query.id)
        .await?
        .ok_or(GetAuthorError::NotFound(query.id))
}
