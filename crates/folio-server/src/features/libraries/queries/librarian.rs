//! Librarian of the library with a given name

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::libraries::types::Librarian;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibrarianForLibraryQuery {
    #[serde(default)]
    pub library: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LibrarianForLibraryError {
    #[error("Library '{0}' not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Option<Librarian>, LibrarianForLibraryError>> for LibrarianForLibraryQuery {}

impl crate::cqrs::middleware::Query for LibrarianForLibraryQuery {}

impl From<LibrarianForLibraryError> for AppError {
    fn from(err: LibrarianForLibraryError) -> Self {
        match err {
            LibrarianForLibraryError::NotFound(name) => AppError::NotFound(format!("Library '{name}' not found")),
            LibrarianForLibraryError::Database(e) => AppError::Database(e),
        }
    }
}

/// `Ok(None)` when the library exists but has no librarian
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    query: LibrarianForLibraryQuery,
) -> Result<Option<Librarian>, LibrarianForLibraryError> {
    let name = query.library.trim();
    let library_id: i64 = sqlx::query_scalar("SELECT id FROM libraries WHERE name = ?")
        .bind(name)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| LibrarianForLibraryError::NotFound(name.to_string()))?;

    let librarian = sqlx::query_as::<_, Librarian>("SELECT id, name FROM librarians WHERE library_id = ?")
        .bind(library_id)
        .fetch_optional(&pool)
        .await?;
    Ok(librarian)
}
