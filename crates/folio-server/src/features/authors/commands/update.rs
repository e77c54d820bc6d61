//! Update author command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::create::MAX_AUTHOR_NAME_LENGTH;
use crate::error::AppError;
use crate::features::authors::types::{fetch_author, Author};
use crate::features::shared::validation::{validate_name, FieldErrors};

/// PUT requires `name`; PATCH (`partial`) may omit it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAuthorCommand {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip)]
    pub partial: bool,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateAuthorError {
    #[error("Author {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Author, UpdateAuthorError>> for UpdateAuthorCommand {}

impl crate::cqrs::middleware::Command for UpdateAuthorCommand {}

impl From<UpdateAuthorError> for AppError {
    fn from(err: UpdateAuthorError) -> Self {
        match err {
            UpdateAuthorError::NotFound(id) => AppError::NotFound(format!("Author {id} not found")),
            UpdateAuthorError::Validation(fields) => AppError::validation(fields),
            UpdateAuthorError::Database(e) => AppError::Database(e),
        }
    }
}

impl UpdateAuthorCommand {
    pub fn validate(&self) -> Result<(), UpdateAuthorError> {
        let mut errors = FieldErrors::default();
        match &self.name {
            Some(name) => errors.check("name", validate_name(name, MAX_AUTHOR_NAME_LENGTH)),
            None if !self.partial => errors.add("name", "This field is required."),
            None => {},
        }
        errors.into_result().map_err(UpdateAuthorError::Validation)
    }
}

#[tracing::instrument(skip(pool, command), fields(author_id = command.id))]
pub async fn handle(pool: SqlitePool, command: UpdateAuthorCommand) -> Result<Author, UpdateAuthorError> {
    let mut author = fetch_author(&pool, command.id)
        .await?
        .ok_or(UpdateAuthorError::NotFound(command.id))?;

    command.validate()?;

    if let Some(name) = command.name {
        sqlx::query("UPDATE authors SET name = ? WHERE id = ?")
            .bind(&name)
            .bind(author.id)
            .execute(&pool)
            .await?;
        author.name = name;
        tracing::info!(author_id = author.id, "Author updated");
    }

    Ok(author)
}
