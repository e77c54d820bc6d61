//! Update book command (full and partial)

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::create::MAX_TITLE_LENGTH;
use crate::error::AppError;
use crate::features::books::types::{author_exists, fetch_book, invalid_pk, Book};
use crate::features::shared::validation::{validate_name, validate_publication_year, FieldErrors};

/// Command to update a catalog book
///
/// With `partial == false` (PUT) every field is required; with
/// `partial == true` (PATCH) absent fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookCommand {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip)]
    pub partial: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<i64>,
    #[serde(default)]
    pub publication_year: Option<i32>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateBookError {
    #[error("Book {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Book, UpdateBookError>> for UpdateBookCommand {}

impl crate::cqrs::middleware::Command for UpdateBookCommand {}

impl From<UpdateBookError> for AppError {
    fn from(err: UpdateBookError) -> Self {
        match err {
            UpdateBookError::NotFound(id) => AppError::NotFound(format!("Book {id} not found")),
            UpdateBookError::Validation(fields) => AppError::validation(fields),
            UpdateBookError::Database(e) => AppError::Database(e),
        }
    }
}

impl UpdateBookCommand {
    pub fn validate(&self) -> Result<(), UpdateBookError> {
        let mut errors = FieldErrors::default();

        if let Some(title) = &self.title {
            errors.check("title", validate_name(title, MAX_TITLE_LENGTH));
        }
        if let Some(year) = self.publication_year {
            errors.check("publication_year", validate_publication_year(year));
        }

        if !self.partial {
            if self.title.is_none() {
                errors.add("title", "This field is required.");
            }
            if self.author.is_none() {
                errors.add("author", "This field is required.");
            }
            if self.publication_year.is_none() {
                errors.add("publication_year", "This field is required.");
            }
        }

        errors.into_result().map_err(UpdateBookError::Validation)
    }
}

#[tracing::instrument(skip(pool, command), fields(book_id = command.id, partial = command.partial))]
pub async fn handle(pool: SqlitePool, command: UpdateBookCommand) -> Result<Book, UpdateBookError> {
    let existing = fetch_book(&pool, command.id)
        .await?
        .ok_or(UpdateBookError::NotFound(command.id))?;

    command.validate()?;

    if let Some(author) = command.author {
        if !author_exists(&pool, author).await? {
            return Err(UpdateBookError::Validation(FieldErrors::single("author", invalid_pk(author))));
        }
    }

    let book = Book {
        id: existing.id,
        title: command.title.unwrap_or(existing.title),
        publication_year: command.publication_year.unwrap_or(existing.publication_year),
        author: command.author.unwrap_or(existing.author),
    };

    sqlx::query("UPDATE books SET title = ?, publication_year = ?, author_id = ? WHERE id = ?")
        .bind(&book.title)
        .bind(book.publication_year)
        .bind(book.author)
        .bind(book.id)
        .execute(&pool)
        .await?;

    tracing::info!(book_id = book.id, "Book updated");
    Ok(book)
}
