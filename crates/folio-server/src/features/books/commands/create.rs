//! Create book command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::books::types::{author_exists, invalid_pk, Book};
use crate::features::shared::validation::{validate_name, validate_publication_year, FieldErrors};

/// Maximum title length
pub const MAX_TITLE_LENGTH: usize = 100;

/// Command to create a catalog book
///
/// Fields are optional on the wire so a missing field is reported as a
/// field error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBookCommand {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<i64>,
    #[serde(default)]
    pub publication_year: Option<i32>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateBookError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Book, CreateBookError>> for CreateBookCommand {}

impl crate::cqrs::middleware::Command for CreateBookCommand {}

impl From<CreateBookError> for AppError {
    fn from(err: CreateBookError) -> Self {
        match err {
            CreateBookError::Validation(fields) => AppError::validation(fields),
            CreateBookError::Database(e) => AppError::Database(e),
        }
    }
}

impl CreateBookCommand {
    /// Checks shape rules that do not need the database
    pub fn validate(&self) -> Result<(), CreateBookError> {
        let mut errors = FieldErrors::default();

        match &self.title {
            Some(title) => errors.check("title", validate_name(title, MAX_TITLE_LENGTH)),
            None => errors.add("title", "This field is required."),
        }

        if self.author.is_none() {
            errors.add("author", "This field is required.");
        }

        match self.publication_year {
            Some(year) => errors.check("publication_year", validate_publication_year(year)),
            None => errors.add("publication_year", "This field is required."),
        }

        errors.into_result().map_err(CreateBookError::Validation)
    }
}

#[tracing::instrument(skip(pool, command), fields(title = ?command.title, author = ?command.author))]
pub async fn handle(pool: SqlitePool, command: CreateBookCommand) -> Result<Book, CreateBookError> {
    command.validate()?;

    let (Some(title), Some(author), Some(publication_year)) =
        (command.title, command.author, command.publication_year)
    else {
        return Err(CreateBookError::Validation(FieldErrors::single(
            "non_field_errors",
            "Missing required fields.",
        )));
    };

    if !author_exists(&pool, author).await? {
        return Err(CreateBookError::Validation(FieldErrors::single("author", invalid_pk(author))));
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO books (title, publication_year, author_id) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(&title)
    .bind(publication_year)
    .bind(author)
    .fetch_one(&pool)
    .await?;

    tracing::info!(book_id = id, "Book created");

    Ok(Book {
        id,
        title,
        publication_year,
        author,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::shared::test_helpers::TestAuthor;
    use chrono::Datelike;

    fn command(title: &str, author: i64, year: i32) -> CreateBookCommand {
        CreateBookCommand {
            title: Some(title.to_string()),
            author: Some(author),
            publication_year: Some(year),
        }
    }

    #[test]
    fn test_validation_requires_every_field() {
        let err = CreateBookCommand::default().validate().unwrap_err();
        let CreateBookError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert!(fields.contains("title"));
        assert!(fields.contains("author"));
        assert!(fields.contains("publication_year"));
    }

    #[test]
    fn test_validation_rejects_future_year_and_long_title() {
        let next_year = chrono::Utc::now().year() + 1;
        let err = command(&"t".repeat(201), 1, next_year).validate().unwrap_err();
        let CreateBookError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            fields.messages("publication_year"),
            ["Publication year cannot be in the future."]
        );
        assert!(fields.contains("title"));
    }

    #[test]
    fn test_title_limit_is_one_hundred_chars() {
        assert!(command(&"t".repeat(100), 1, 2001).validate().is_ok());

        let err = command(&"t".repeat(101), 1, 2001).validate().unwrap_err();
        let CreateBookError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert!(fields.contains("title"));
    }

    #[tokio::test]
    async fn test_handle_creates_book() {
        let pool = create_memory_pool().await.unwrap();
        let author = TestAuthor::new("Octavia Butler").insert(&pool).await.unwrap();

        let book = handle(pool.clone(), command("Kindred", author.id, 1979)).await.unwrap();
        assert_eq!(book.title, "Kindred");
        assert_eq!(book.author, author.id);

        let stored = crate::features::books::types::fetch_book(&pool, book.id).await.unwrap();
        assert_eq!(stored, Some(book));
    }

    #[tokio::test]
    async fn test_handle_rejects_unknown_author() {
        let pool = create_memory_pool().await.unwrap();
        let err = handle(pool, command("Orphan", 77, 2001)).await.unwrap_err();
        let CreateBookError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.messages("author"), ["Invalid pk \"77\" - object does not exist."]);
    }
}
