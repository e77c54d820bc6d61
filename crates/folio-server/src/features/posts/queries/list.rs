//! List posts, newest first, one page at a time

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::posts::types::{with_tags, Post, PostRow, POST_COLUMNS, POST_FROM, POST_ORDER};
use crate::features::shared::pagination::{Paginated, PaginationParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListPostsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListPostsError {
    #[error("Invalid pagination: {0}")]
    InvalidPagination(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<Post>, ListPostsError>> for ListPostsQuery {}

impl crate::cqrs::middleware::Query for ListPostsQuery {}

impl From<ListPostsError> for AppError {
    fn from(err: ListPostsError) -> Self {
        match err {
            ListPostsError::InvalidPagination(message) => AppError::BadRequest(message.to_string()),
            ListPostsError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: ListPostsQuery) -> Result<Paginated<Post>, ListPostsError> {
    let pagination = query.pagination();
    pagination.validate().map_err(ListPostsError::InvalidPagination)?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(&pool)
        .await?;

    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} {POST_FROM} {POST_ORDER} LIMIT ? OFFSET ?"
    ))
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    let posts = with_tags(&pool, rows).await?;
    Ok(Paginated::from_items(posts, &pagination, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::shared::test_helpers::{TestPost, TestUser};

    #[tokio::test]
    async fn test_pages_newest_first() {
        let pool = create_memory_pool().await.unwrap();
        let user = TestUser::new("writer").insert(&pool).await.unwrap();
        for title in ["one", "two", "three"] {
            TestPost::new(&user, title).insert(&pool).await.unwrap();
        }

        let page = handle(
            pool.clone(),
            ListPostsQuery {
                page: Some(1),
                per_page: Some(2),
            },
        )
        .await
        .unwrap();
        let titles: Vec<_> = page.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["three", "two"]);
        assert_eq!(page.pagination.total, 3);
        assert!(page.pagination.has_next);

        let last = handle(
            pool,
            ListPostsQuery {
                page: Some(2),
                per_page: Some(2),
            },
        )
        .await
        .unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].title, "one");
    }

    #[tokio::test]
    async fn test_invalid_page_is_rejected() {
        let pool = create_memory_pool().await.unwrap();
        let result = handle(
            pool,
            ListPostsQuery {
                page: Some(0),
                per_page: None,
            },
        )
        .await;
        assert!(matches!(result, Err(ListPostsError::InvalidPagination(_))));
    }
}
