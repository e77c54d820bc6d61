//! Assign (or rename) the single librarian of a library

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::libraries::types::Librarian;
use crate::features::shared::validation::{validate_name, FieldErrors};

pub const MAX_LIBRARIAN_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignLibrarianCommand {
    #[serde(skip)]
    pub library_id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AssignLibrarianError {
    #[error("Library {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Librarian, AssignLibrarianError>> for AssignLibrarianCommand {}

impl crate::cqrs::middleware::Command for AssignLibrarianCommand {}

impl AssignLibrarianCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check("name", validate_name(&self.name, MAX_LIBRARIAN_NAME_LENGTH));
        errors.into_result()
    }
}

impl From<AssignLibrarianError> for AppError {
    fn from(err: AssignLibrarianError) -> Self {
        match err {
            AssignLibrarianError::NotFound(id) => AppError::NotFound(format!("Library {id} not found")),
            AssignLibrarianError::Validation(fields) => AppError::validation(fields),
            AssignLibrarianError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(library_id = command.library_id))]
pub async fn handle(
    pool: SqlitePool,
    command: AssignLibrarianCommand,
) -> Result<Librarian, AssignLibrarianError> {
    command.validate()?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM libraries WHERE id = ?)")
        .bind(command.library_id)
        .fetch_one(&pool)
        .await?;
    if !exists {
        return Err(AssignLibrarianError::NotFound(command.library_id));
    }

    let librarian = sqlx::query_as::<_, Librarian>(
        r#"
        INSERT INTO librarians (name, library_id) VALUES (?, ?)
        ON CONFLICT (library_id) DO UPDATE SET name = excluded.name
        RETURNING id, name
        "#,
    )
    .bind(command.name.trim())
    .bind(command.library_id)
    .fetch_one(&pool)
    .await?;

    tracing::info!(library_id = command.library_id, librarian_id = librarian.id, "Librarian assigned");
    Ok(librarian)
}
