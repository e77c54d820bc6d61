//! List books with filtering, search and ordering
//!
//! - `title`, `author`, `publication_year`: exact match filters
//! - `search`: whitespace/comma separated terms; every term must appear
//!   (case-insensitively) in the title or the author's name
//! - `ordering`: comma separated `title` / `publication_year`, `-` prefix for
//!   descending; unknown fields are ignored

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::AppError;
use crate::features::books::types::{Book, BOOK_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListBooksQuery {
    pub title: Option<String>,
    pub author: Option<i64>,
    pub publication_year: Option<i32>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListBooksError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<Book>, ListBooksError>> for ListBooksQuery {}

impl crate::cqrs::middleware::Query for ListBooksQuery {}

impl From<ListBooksError> for AppError {
    fn from(err: ListBooksError) -> Self {
        match err {
            ListBooksError::Database(e) => AppError::Database(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Title,
    PublicationYear,
}

impl OrderField {
    fn column(self) -> &'static str {
        match self {
            OrderField::Title => "b.title",
            OrderField::PublicationYear => "b.publication_year",
        }
    }
}

/// `(field, descending)` pairs in priority order
pub fn parse_ordering(ordering: &str) -> Vec<(OrderField, bool)> {
    ordering
        .split(',')
        .map(str::trim)
        .filter_map(|term| {
            let (descending, name) = match term.strip_prefix('-') {
                Some(name) => (true, name),
                None => (false, term),
            };
            let field = match name {
                "title" => OrderField::Title,
                "publication_year" => OrderField::PublicationYear,
                _ => return None,
            };
            Some((field, descending))
        })
        .collect()
}

/// Split a search string on whitespace and commas
///
/// Terms are ASCII-folded to match SQLite's `lower()`.
pub fn search_terms(search: &str) -> Vec<String> {
    search
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: ListBooksQuery) -> Result<Vec<Book>, ListBooksError> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {BOOK_COLUMNS} FROM books b JOIN authors a ON a.id = b.author_id WHERE 1 = 1"
    ));

    if let Some(title) = &query.title {
        builder.push(" AND b.title = ").push_bind(title.clone());
    }
    if let Some(author) = query.author {
        builder.push(" AND b.author_id = ").push_bind(author);
    }
    if let Some(year) = query.publication_year {
        builder.push(" AND b.publication_year = ").push_bind(year);
    }

    for term in query.search.as_deref().map(search_terms).unwrap_or_default() {
        builder
            .push(" AND (instr(lower(b.title), ")
            .push_bind(term.clone())
            .push(") > 0 OR instr(lower(a.name), ")
            .push_bind(term)
            .push(") > 0)");
    }

    builder.push(" ORDER BY ");
    for (field, descending) in query.ordering.as_deref().map(parse_ordering).unwrap_or_default() {
        builder
            .push(field.column())
            .push(if descending { " DESC, " } else { " ASC, " });
    }
    builder.push("b.id ASC");

    let books = builder.build_query_as::<Book>().fetch_all(&pool).await?;
    tracing::debug!(count = books.len(), "Books listed");
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::shared::test_helpers::{TestAuthor, TestBook};

    #[test]
    fn test_parse_ordering() {
        assert_eq!(
            parse_ordering("-publication_year, title,shoe_size"),
            vec![(OrderField::PublicationYear, true), (OrderField::Title, false)]
        );
        assert!(parse_ordering("").is_empty());
        assert!(parse_ordering("-id").is_empty());
    }

    #[test]
    fn test_search_terms() {
        assert_eq!(search_terms("Dune,  herbert"), vec!["dune", "herbert"]);
        assert!(search_terms(" , ").is_empty());
        assert_eq!(search_terms("ÉMILE Zola"), vec!["Émile", "zola"]);
    }

    async fn fixture() -> SqlitePool {
        let pool = create_memory_pool().await.unwrap();
        let herbert = TestAuthor::new("Frank Herbert").insert(&pool).await.unwrap();
        let le_guin = TestAuthor::new("Ursula Le Guin").insert(&pool).await.unwrap();
        TestBook::new(&herbert, "Dune", 1965).insert(&pool).await.unwrap();
        TestBook::new(&le_guin, "The Left Hand of Darkness", 1969).insert(&pool).await.unwrap();
        TestBook::new(&le_guin, "A Wizard of Earthsea", 1968).insert(&pool).await.unwrap();
        pool
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_default_order_is_by_id() {
        let books = handle(fixture().await, ListBooksQuery::default()).await.unwrap();
        assert_eq!(
            titles(&books),
            ["Dune", "The Left Hand of Darkness", "A Wizard of Earthsea"]
        );
    }

    #[tokio::test]
    async fn test_search_matches_title_or_author_for_every_term() {
        let pool = fixture().await;
        let query = |s: &str| ListBooksQuery {
            search: Some(s.to_string()),
            ..Default::default()
        };

        let books = handle(pool.clone(), query("le guin")).await.unwrap();
        assert_eq!(books.len(), 2);

        let books = handle(pool.clone(), query("guin,earthsea")).await.unwrap();
        assert_eq!(titles(&books), ["A Wizard of Earthsea"]);

        let books = handle(pool, query("herbert darkness")).await.unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_non_ascii_author() {
        let pool = create_memory_pool().await.unwrap();
        let zola = TestAuthor::new("Émile Zola").insert(&pool).await.unwrap();
        TestBook::new(&zola, "Germinal", 1885).insert(&pool).await.unwrap();

        for search in ["Émile", "ÉMILE ZOLA", "zola germinal"] {
            let books = handle(
                pool.clone(),
                ListBooksQuery {
                    search: Some(search.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            assert_eq!(titles(&books), ["Germinal"], "search {search:?}");
        }
    }

    #[tokio::test]
    async fn test_filters_and_ordering() {
        let pool = fixture().await;

        let books = handle(
            pool.clone(),
            ListBooksQuery {
                ordering: Some("-publication_year".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            books.iter().map(|b| b.publication_year).collect::<Vec<_>>(),
            [1969, 1968, 1965]
        );

        let books = handle(
            pool,
            ListBooksQuery {
                publication_year: Some(1965),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(titles(&books), ["Dune"]);
    }
}
