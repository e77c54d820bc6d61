use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// A comment on a blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post: i64,
    pub author: i64,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id AS post, c.author_id AS author, u.username AS author_username,
           c.content, c.created_at, c.updated_at
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

pub(crate) async fn fetch_comment(pool: &SqlitePool, id: i64) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!("{COMMENT_SELECT} WHERE c.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Comments on a post, oldest first
pub(crate) async fn comments_for_post(pool: &SqlitePool, post_id: i64) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!("{COMMENT_SELECT} WHERE c.post_id = ? ORDER BY c.created_at, c.id"))
        .bind(post_id)
        .fetch_all(pool)
        .await
}

/// Author id of a comment, if the comment exists
pub(crate) async fn comment_owner(pool: &SqlitePool, id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT author_id FROM comments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}
