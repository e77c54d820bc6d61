//! Replace the set of books held by a library

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::libraries::types::{
    fetch_library_detail, first_missing_book, normalize_book_ids, replace_library_books, unknown_book,
    LibraryDetail,
};
use crate::features::shared::validation::FieldErrors;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetLibraryBooksCommand {
    #[serde(skip)]
    pub library_id: i64,
    #[serde(default)]
    pub book_ids: Vec<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum SetLibraryBooksError {
    #[error("Library {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<LibraryDetail, SetLibraryBooksError>> for SetLibraryBooksCommand {}

impl crate::cqrs::middleware::Command for SetLibraryBooksCommand {}

impl From<SetLibraryBooksError> for AppError {
    fn from(err: SetLibraryBooksError) -> Self {
        match err {
            SetLibraryBooksError::NotFound(id) => AppError::NotFound(format!("Library {id} not found")),
            SetLibraryBooksError::Validation(fields) => AppError::validation(fields),
            SetLibraryBooksError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(library_id = command.library_id))]
pub async fn handle(
    pool: SqlitePool,
    command: SetLibraryBooksCommand,
) -> Result<LibraryDetail, SetLibraryBooksError> {
    let book_ids = normalize_book_ids(&command.book_ids);

    let mut tx = pool.begin().await?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM libraries WHERE id = ?)")
        .bind(command.library_id)
        .fetch_one(&mut *tx)
        .await?;
    if !exists {
        return Err(SetLibraryBooksError::NotFound(command.library_id));
    }
    if let Some(book_id) = first_missing_book(&mut tx, &book_ids).await? {
        return Err(unknown_book(book_id).into());
    }

    replace_library_books(&mut tx, command.library_id, &book_ids).await?;
    tx.commit().await?;

    tracing::info!(library_id = command.library_id, books = book_ids.len(), "Library books replaced");

    fetch_library_detail(&pool, command.library_id)
        .await?
        .ok_or(SetLibraryBooksError::NotFound(command.library_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::libraries::commands::create::{self, CreateLibraryCommand};
    use crate::features::shared::test_helpers::{TestAuthor, TestBook};

    #[tokio::test]
    async fn test_replaces_existing_links() {
        let pool = create_memory_pool().await.unwrap();
        let author = TestAuthor::new("N. K. Jemisin").insert(&pool).await.unwrap();
        let first = TestBook::new(&author, "The Fifth Season", 2015).insert(&pool).await.unwrap();
        let second = TestBook::new(&author, "The Obelisk Gate", 2016).insert(&pool).await.unwrap();

        let library = create::handle(
            pool.clone(),
            CreateLibraryCommand {
                name: "Stillness".into(),
                book_ids: vec![first.id],
            },
        )
        .await
        .unwrap();

        let updated = handle(
            pool,
            SetLibraryBooksCommand {
                library_id: library.id,
                book_ids: vec![second.id],
            },
        )
        .await
        .unwrap();

        let ids: Vec<_> = updated.books.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second.id]);
    }

    #[tokio::test]
    async fn test_missing_library_is_not_found() {
        let pool = create_memory_pool().await.unwrap();
        let result = handle(
            pool,
            SetLibraryBooksCommand {
                library_id: 9,
                book_ids: vec![],
            },
        )
        .await;
        assert!(matches!(result, Err(SetLibraryBooksError::NotFound(9))));
    }
}
