//! Library read models and helpers shared by the library commands

use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

use crate::features::books::types::invalid_pk;
use crate::features::shared::validation::FieldErrors;

/// Row of the library listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LibrarySummary {
    pub id: i64,
    pub name: String,
    pub book_count: i64,
}

/// A book as shown inside a library, with the author's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LibraryBook {
    pub id: i64,
    pub title: String,
    pub publication_year: i32,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Librarian {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDetail {
    pub id: i64,
    pub name: String,
    pub books: Vec<LibraryBook>,
    pub librarian: Option<Librarian>,
}

pub(crate) const LIBRARY_BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.publication_year, a.name AS author
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

pub(crate) async fn fetch_library_detail(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<LibraryDetail>, sqlx::Error> {
    let Some(name) = sqlx::query_scalar::<_, String>("SELECT name FROM libraries WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let books = sqlx::query_as::<_, LibraryBook>(&format!(
        "{LIBRARY_BOOK_SELECT} JOIN library_books lb ON lb.book_id = b.id WHERE lb.library_id = ? ORDER BY b.title, b.id"
    ))
    .bind(id)
    .fetch_all(pool)
    .await?;

    let librarian = sqlx::query_as::<_, Librarian>("SELECT id, name FROM librarians WHERE library_id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(Some(LibraryDetail {
        id,
        name,
        books,
        librarian,
    }))
}

/// Deduplicate and sort requested book ids
pub(crate) fn normalize_book_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// First id in `book_ids` with no matching book
pub(crate) async fn first_missing_book(
    conn: &mut SqliteConnection,
    book_ids: &[i64],
) -> Result<Option<i64>, sqlx::Error> {
    for &book_id in book_ids {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = ?)")
            .bind(book_id)
            .fetch_one(&mut *conn)
            .await?;
        if !exists {
            return Ok(Some(book_id));
        }
    }
    Ok(None)
}

/// Replace the book set of a library
pub(crate) async fn replace_library_books(
    conn: &mut SqliteConnection,
    library_id: i64,
    book_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM library_books WHERE library_id = ?")
        .bind(library_id)
        .execute(&mut *conn)
        .await?;

    for &book_id in book_ids {
        sqlx::query("INSERT INTO library_books (library_id, book_id) VALUES (?, ?)")
            .bind(library_id)
            .bind(book_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Validation error for an unknown book id
pub(crate) fn unknown_book(book_id: i64) -> FieldErrors {
    FieldErrors::single("book_ids", invalid_pk(book_id))
}
