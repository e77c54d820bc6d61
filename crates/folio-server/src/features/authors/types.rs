use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::features::books::types::{Book, BOOK_COLUMNS};

/// Author with a nested, read-only list of their books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub books: Vec<Book>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct AuthorRow {
    pub id: i64,
    pub name: String,
}

/// Attach books to author rows with a single extra query
pub(crate) async fn with_books(pool: &SqlitePool, rows: Vec<AuthorRow>) -> Result<Vec<Author>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new(format!(
        "SELECT {BOOK_COLUMNS} FROM books b WHERE b.author_id IN ("
    ));
    let mut ids = builder.separated(", ");
    for row in &rows {
        ids.push_bind(row.id);
    }
    builder.push(") ORDER BY b.id");

    let mut by_author: HashMap<i64, Vec<Book>> = HashMap::new();
    for book in builder.build_query_as::<Book>().fetch_all(pool).await? {
        by_author.entry(book.author).or_default().push(book);
    }

    Ok(rows
        .into_iter()
        .map(|row| Author {
            books: by_author.remove(&row.id).unwrap_or_default(),
            id: row.id,
            name: row.name,
        })
        .collect())
}

pub(crate) async fn fetch_author(pool: &SqlitePool, id: i64) -> Result<Option<Author>, sqlx::Error> {
    let row = sqlx::query_as::<_, AuthorRow>("SELECT id, name FROM authors WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(with_books(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}
