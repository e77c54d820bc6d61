//! Create a bookshelf entry

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::bookshelf::types::{ShelfBook, ShelfBookForm};
use crate::features::shared::validation::FieldErrors;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateShelfBookCommand {
    #[serde(flatten)]
    pub form: ShelfBookForm,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateShelfBookError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ShelfBook, CreateShelfBookError>> for CreateShelfBookCommand {}

impl crate::cqrs::middleware::Command for CreateShelfBookCommand {}

impl From<CreateShelfBookError> for AppError {
    fn from(err: CreateShelfBookError) -> Self {
        match err {
            CreateShelfBookError::Validation(fields) => AppError::validation(fields),
            CreateShelfBookError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(title = %command.form.title))]
pub async fn handle(
    pool: SqlitePool,
    command: CreateShelfBookCommand,
) -> Result<ShelfBook, CreateShelfBookError> {
    let clean = command.form.validate()?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO shelf_books (title, author, publication_year) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(&clean.title)
    .bind(&clean.author)
    .bind(clean.publication_year)
    .fetch_one(&pool)
    .await?;

    tracing::info!(shelf_book_id = id, "Bookshelf entry created");

    Ok(ShelfBook {
        id,
        title: clean.title,
        author: clean.author,
        publication_year: clean.publication_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn test_create_stores_author_as_text() {
        let pool = create_memory_pool().await.unwrap();

        let book = handle(
            pool.clone(),
            CreateShelfBookCommand {
                form: ShelfBookForm {
                    title: "Record of a Spaceborn Few".into(),
                    author_name: " Becky Chambers ".into(),
                    publication_year: Some(2018),
                },
            },
        )
        .await
        .unwrap();

        assert_eq!(book.author, "Becky Chambers");

        // the catalog is untouched
        let (authors, books): (i64, i64) =
            sqlx::query_as("SELECT (SELECT COUNT(*) FROM authors), (SELECT COUNT(*) FROM books)")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!((authors, books), (0, 0));
    }
}
