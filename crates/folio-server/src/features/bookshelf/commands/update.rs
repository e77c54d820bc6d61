//! Update a bookshelf entry

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::bookshelf::types::{ShelfBook, ShelfBookForm};
use crate::features::shared::validation::FieldErrors;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShelfBookCommand {
    #[serde(skip)]
    pub id: i64,
    #[serde(flatten)]
    pub form: ShelfBookForm,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateShelfBookError {
    #[error("Book {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ShelfBook, UpdateShelfBookError>> for UpdateShelfBookCommand {}

impl crate::cqrs::middleware::Command for UpdateShelfBookCommand {}

impl From<UpdateShelfBookError> for AppError {
    fn from(err: UpdateShelfBookError) -> Self {
        match err {
            UpdateShelfBookError::NotFound(id) => AppError::NotFound(format!("Book {id} not found")),
            UpdateShelfBookError::Validation(fields) => AppError::validation(fields),
            UpdateShelfBookError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(shelf_book_id = command.id))]
pub async fn handle(
    pool: SqlitePool,
    command: UpdateShelfBookCommand,
) -> Result<ShelfBook, UpdateShelfBookError> {
    let clean = command.form.validate()?;

    let result = sqlx::query("UPDATE shelf_books SET title = ?, author = ?, publication_year = ? WHERE id = ?")
        .bind(&clean.title)
        .bind(&clean.author)
        .bind(clean.publication_year)
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(UpdateShelfBookError::NotFound(command.id));
    }

    tracing::info!(shelf_book_id = command.id, "Bookshelf entry updated");

    Ok(ShelfBook {
        id: command.id,
        title: clean.title,
        author: clean.author,
        publication_year: clean.publication_year,
    })
}
