//! Create author command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::authors::types::Author;
use crate::features::shared::validation::{validate_name, FieldErrors};

/// Maximum author name length
pub const MAX_AUTHOR_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAuthorCommand {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateAuthorError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Author, CreateAuthorError>> for CreateAuthorCommand {}

impl crate::cqrs::middleware::Command for CreateAuthorCommand {}

impl From<CreateAuthorError> for AppError {
    fn from(err: CreateAuthorError) -> Self {
        match err {
            CreateAuthorError::Validation(fields) => AppError::validation(fields),
            CreateAuthorError::Database(e) => AppError::Database(e),
        }
    }
}

impl CreateAuthorCommand {
    pub fn validate(&self) -> Result<(), CreateAuthorError> {
        let mut errors = FieldErrors::default();
        errors.check("name", validate_name(&self.name, MAX_AUTHOR_NAME_LENGTH));
        errors.into_result().map_err(CreateAuthorError::Validation)
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(pool: SqlitePool, command: CreateAuthorCommand) -> Result<Author, CreateAuthorError> {
    command.validate()?;

    let id: i64 = sqlx::query_scalar("INSERT INTO authors (name) VALUES (?) RETURNING id")
        .bind(&command.name)
        .fetch_one(&pool)
        .await?;

    tracing::info!(author_id = id, "Author created");

    Ok(Author {
        id,
        name: command.name,
        books: Vec::new(),
    })
}
