//! Book representation shared by the catalog commands and queries

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// A catalog book; `author` is the author's id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub publication_year: i32,
    pub author: i64,
}

pub(crate) const BOOK_COLUMNS: &str = "b.id, b.title, b.publication_year, b.author_id AS author";

pub(crate) async fn fetch_book(pool: &SqlitePool, id: i64) -> Result<Option<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books b WHERE b.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn author_exists(pool: &SqlitePool, author_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = ?)")
        .bind(author_id)
        .fetch_one(pool)
        .await
}

/// Message for a reference to a row that does not exist
pub(crate) fn invalid_pk(pk: i64) -> String {
    format!("Invalid pk \"{pk}\" - object does not exist.")
}
