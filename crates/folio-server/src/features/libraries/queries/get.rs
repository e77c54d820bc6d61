//! Get a library with its books and librarian

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::libraries::types::{fetch_library_detail, LibraryDetail};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetLibraryQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetLibraryError {
    #[error("Library {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<LibraryDetail, GetLibraryError>> for GetLibraryQuery {}

impl crate::cqrs::middleware::Query for GetLibraryQuery {}

impl From<GetLibraryError> for AppError {
    fn from(err: GetLibraryError) -> Self {
        match err {
            GetLibraryError::NotFound(id) => AppError::NotFound(format!("Library {id} not found")),
            GetLibraryError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetLibraryQuery) -> Result<LibraryDetail, GetLibraryError> {
    fetch_library_detail(&pool, query.id)
        .await?
        .ok_or(GetLibraryError::NotFound(query.id))
}
