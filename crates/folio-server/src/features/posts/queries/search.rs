//! Full-text-ish post search over title, content and tag names

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::posts::types::{with_tags, Post, PostRow, POST_COLUMNS, POST_FROM, POST_ORDER};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPostsQuery {
    #[serde(default)]
    pub q: Option<String>,
}

impl SearchPostsQuery {
    /// Trimmed search text, `None` when blank
    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchPostsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<Post>, SearchPostsError>> for SearchPostsQuery {}

impl crate::cqrs::middleware::Query for SearchPostsQuery {}

impl From<SearchPostsError> for AppError {
    fn from(err: SearchPostsError) -> Self {
        match err {
            SearchPostsError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: SearchPostsQuery) -> Result<Vec<Post>, SearchPostsError> {
    let Some(text) = query.text() else {
        return Ok(Vec::new());
    };
    // SQLite lower() only folds ASCII, so fold the needle the same way
    let needle = text.to_ascii_lowercase();

    let rows = sqlx::query_as::<_, PostRow>(&format!(
        r#"
        SELECT {POST_COLUMNS} {POST_FROM}
        WHERE instr(lower(p.title), ?1) > 0
           OR instr(lower(p.content), ?1) > 0
           OR EXISTS (
               SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id
               WHERE pt.post_id = p.id AND instr(lower(t.name), ?1) > 0
           )
        {POST_ORDER}
        "#
    ))
    .bind(&needle)
    .fetch_all(&pool)
    .await?;

    tracing::debug!(query = text, results = rows.len(), "Post search");
    Ok(with_tags(&pool, rows).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::shared::test_helpers::{TestPost, TestUser};

    #[tokio::test]
    async fn test_search_matches_title_content_and_tags_once() {
        let pool = create_memory_pool().await.unwrap();
        let user = TestUser::new("writer").insert(&pool).await.unwrap();
        TestPost::new(&user, "Rust tips").with_tags(&["rustacean"]).insert(&pool).await.unwrap();
        TestPost::new(&user, "Gardening").with_content("Rust on leaves").insert(&pool).await.unwrap();
        TestPost::new(&user, "Baking").with_tags(&["RUSTIC"]).insert(&pool).await.unwrap();
        TestPost::new(&user, "Unrelated").insert(&pool).await.unwrap();

        let posts = handle(pool, SearchPostsQuery { q: Some("rust".into()) }).await.unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Baking", "Gardening", "Rust tips"]);
    }

    #[tokio::test]
    async fn test_search_keeps_non_ascii_letters() {
        let pool = create_memory_pool().await.unwrap();
        let user = TestUser::new("writer").insert(&pool).await.unwrap();
        TestPost::new(&user, "Émile Zola").insert(&pool).await.unwrap();

        for q in ["Émile", "ÉMILE ZOLA"] {
            let posts = handle(pool.clone(), SearchPostsQuery { q: Some(q.into()) }).await.unwrap();
            assert_eq!(posts.len(), 1, "query {q:?}");
        }
    }

    #[tokio::test]
    async fn test_blank_query_returns_nothing() {
        let pool = create_memory_pool().await.unwrap();
        let user = TestUser::new("writer").insert(&pool).await.unwrap();
        TestPost::new(&user, "Anything").insert(&pool).await.unwrap();

        assert!(handle(pool.clone(), SearchPostsQuery { q: None }).await.unwrap().is_empty());
        assert!(handle(pool, SearchPostsQuery { q: Some("   ".into()) }).await.unwrap().is_empty());
    }
}
