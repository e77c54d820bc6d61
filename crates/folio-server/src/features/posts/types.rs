//! Blog post representations and tag helpers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;

use crate::features::comments::types::Comment;
use crate::features::shared::validation::{validate_name, FieldErrors};

pub const MAX_POST_TITLE_LENGTH: usize = 200;
pub const MAX_TAG_LENGTH: usize = 100;

/// A post with its author and tag names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published_date: DateTime<Utc>,
    pub author: i64,
    pub author_username: String,
    pub tags: Vec<String>,
}

/// A post with its comments, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published_date: DateTime<Utc>,
    pub author: i64,
    pub author_username: String,
}

pub(crate) const POST_COLUMNS: &str =
    "p.id, p.title, p.content, p.published_date, p.author_id AS author, u.username AS author_username";

pub(crate) const POST_FROM: &str = "FROM posts p JOIN users u ON u.id = p.author_id";

pub(crate) const POST_ORDER: &str = "ORDER BY p.published_date DESC, p.id DESC";

/// Attach tag names to post rows with a single query
pub(crate) async fn with_tags(pool: &SqlitePool, rows: Vec<PostRow>) -> Result<Vec<Post>, sqlx::Error> {
    let mut tags: HashMap<i64, Vec<String>> = HashMap::new();

    if !rows.is_empty() {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT pt.post_id, t.name FROM post_tags pt JOIN tags t ON t.id = pt.tag_id WHERE pt.post_id IN (",
        );
        let mut ids = builder.separated(", ");
        for row in &rows {
            ids.push_bind(row.id);
        }
        builder.push(") ORDER BY t.name");

        let pairs: Vec<(i64, String)> = builder.build_query_as().fetch_all(pool).await?;
        for (post_id, name) in pairs {
            tags.entry(post_id).or_default().push(name);
        }
    }

    Ok(rows
        .into_iter()
        .map(|row| Post {
            tags: tags.remove(&row.id).unwrap_or_default(),
            id: row.id,
            title: row.title,
            content: row.content,
            published_date: row.published_date,
            author: row.author,
            author_username: row.author_username,
        })
        .collect())
}

pub(crate) async fn fetch_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>, sqlx::Error> {
    let row = sqlx::query_as::<_, PostRow>(&format!("SELECT {POST_COLUMNS} {POST_FROM} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(with_tags(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Author id of a post, if the post exists
pub(crate) async fn post_owner(pool: &SqlitePool, id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT author_id FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Trim tag names, drop blanks and duplicates, keep first-seen order
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !seen.iter().any(|s| s == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}

pub(crate) fn validate_tags(errors: &mut FieldErrors, tags: &[String]) {
    for tag in tags {
        if let Err(e) = validate_name(tag, MAX_TAG_LENGTH) {
            errors.add("tags", format!("{tag}: {e}"));
        }
    }
}

/// Replace a post's tags, creating missing tags by name
pub(crate) async fn set_post_tags(
    conn: &mut SqliteConnection,
    post_id: i64,
    tags: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;

    for tag in tags {
        sqlx::query("INSERT INTO tags (name) VALUES (?) ON CONFLICT (name) DO NOTHING")
            .bind(tag)
            .execute(&mut *conn)
            .await?;
        sqlx::query("INSERT INTO post_tags (post_id, tag_id) SELECT ?, id FROM tags WHERE name = ?")
            .bind(post_id)
            .bind(tag)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
