//! List libraries with their book counts

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::libraries::types::LibrarySummary;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListLibrariesQuery {}

#[derive(Debug, thiserror::Error)]
pub enum ListLibrariesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<LibrarySummary>, ListLibrariesError>> for ListLibrariesQuery {}

impl crate::cqrs::middleware::Query for ListLibrariesQuery {}

impl From<ListLibrariesError> for AppError {
    fn from(err: ListLibrariesError) -> Self {
        match err {
            ListLibrariesError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: ListLibrariesQuery,
) -> Result<Vec<LibrarySummary>, ListLibrariesError> {
    let libraries = sqlx::query_as::<_, LibrarySummary>(
        r#"
        SELECT l.id, l.name, COUNT(lb.book_id) AS book_count
        FROM libraries l
        LEFT JOIN library_books lb ON lb.library_id = l.id
        GROUP BY l.id, l.name
        ORDER BY l.name, l.id
        "#,
    )
    .fetch_all(&pool)
    .await?;
    Ok(libraries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::libraries::commands::create::{self, CreateLibraryCommand};
    use crate::features::shared::test_helpers::{TestAuthor, TestBook};

    #[tokio::test]
    async fn test_counts_books_per_library() {
        let pool = create_memory_pool().await.unwrap();
        let author = TestAuthor::new("Author One").insert(&pool).await.unwrap();
        let book = TestBook::new(&author, "Book A", 2000).insert(&pool).await.unwrap();

        for (name, book_ids) in [("Community Library", vec![]), ("Central Library", vec![book.id])] {
            create::handle(
                pool.clone(),
                CreateLibraryCommand {
                    name: name.into(),
                    book_ids,
                },
            )
            .await
            .unwrap();
        }

        let libraries = handle(pool, ListLibrariesQuery::default()).await.unwrap();
        let summary: Vec<_> = libraries.iter().map(|l| (l.name.as_str(), l.book_count)).collect();
        assert_eq!(summary, vec![("Central Library", 1), ("Community Library", 0)]);
    }
}
