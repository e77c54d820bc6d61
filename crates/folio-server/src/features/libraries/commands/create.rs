//! Create a library, optionally stocked with existing books

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::libraries::types::{
    fetch_library_detail, first_missing_book, normalize_book_ids, replace_library_books, unknown_book,
    LibraryDetail,
};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{validate_name, FieldErrors};

pub const MAX_LIBRARY_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLibraryCommand {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub book_ids: Vec<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateLibraryError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Library '{0}' already exists")]
    DuplicateName(String),

    #[error("Library {0} vanished after creation")]
    Missing(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<LibraryDetail, CreateLibraryError>> for CreateLibraryCommand {}

impl crate::cqrs::middleware::Command for CreateLibraryCommand {}

impl CreateLibraryCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check("name", validate_name(&self.name, MAX_LIBRARY_NAME_LENGTH));
        errors.into_result()
    }
}

impl From<CreateLibraryError> for AppError {
    fn from(err: CreateLibraryError) -> Self {
        match err {
            CreateLibraryError::Validation(fields) => AppError::validation(fields),
            CreateLibraryError::DuplicateName(name) => {
                AppError::Conflict(format!("Library '{name}' already exists"))
            },
            CreateLibraryError::Missing(id) => AppError::Internal(format!("Library {id} vanished after creation")),
            CreateLibraryError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: SqlitePool,
    command: CreateLibraryCommand,
) -> Result<LibraryDetail, CreateLibraryError> {
    command.validate()?;
    let name = command.name.trim().to_string();
    let book_ids = normalize_book_ids(&command.book_ids);

    let mut tx = pool.begin().await?;
    if let Some(book_id) = first_missing_book(&mut tx, &book_ids).await? {
        return Err(unknown_book(book_id).into());
    }

    let id: i64 = sqlx::query_scalar("INSERT INTO libraries (name) VALUES (?) RETURNING id")
        .bind(&name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, CreateLibraryError::DuplicateName(name.clone()), Into::into))?;

    replace_library_books(&mut tx, id, &book_ids).await?;
    tx.commit().await?;

    tracing::info!(library_id = id, books = book_ids.len(), "Library created");

    fetch_library_detail(&pool, id)
        .await?
        .ok_or(CreateLibraryError::Missing(id))
}
