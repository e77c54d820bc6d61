//! Get a single bookshelf entry

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::bookshelf::types::{fetch_shelf_book, ShelfBook};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetShelfBookQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetShelfBookError {
    #[error("Book {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ShelfBook, GetShelfBookError>> for GetShelfBookQuery {}

impl crate::cqrs::middleware::Query for GetShelfBookQuery {}

impl From<GetShelfBookError> for AppError {
    fn from(err: GetShelfBookError) -> Self {
        match err {
            GetShelfBookError::NotFound(id) => AppError::NotFound(format!("Book {id} not found")),
            GetShelfBookError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetShelfBookQuery) -> Result<ShelfBook, GetShelfBookError> {
    fetch_shelf_book(&pool, query.id)
        .await?
        .ok_or(GetShelfBookError::NotFound(query.id))
}
