use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::shared::validation::{validate_name, validate_publication_year, FieldErrors};

/// Maximum shelf title length
pub const MAX_SHELF_TITLE_LENGTH: usize = 200;

/// Maximum shelf author length
pub const MAX_SHELF_AUTHOR_LENGTH: usize = 100;

/// A bookshelf entry; the author is free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShelfBook {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
}

pub(crate) const SHELF_BOOK_SELECT: &str = "SELECT id, title, author, publication_year FROM shelf_books";

pub(crate) async fn fetch_shelf_book(pool: &SqlitePool, id: i64) -> Result<Option<ShelfBook>, sqlx::Error> {
    sqlx::query_as::<_, ShelfBook>(&format!("{SHELF_BOOK_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Form body shared by create and update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShelfBookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "author")]
    pub author_name: String,
    #[serde(default)]
    pub publication_year: Option<i32>,
}

/// A validated form, trimmed and ready to store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanShelfBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
}

impl ShelfBookForm {
    pub fn validate(&self) -> Result<CleanShelfBook, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check("title", validate_name(&self.title, MAX_SHELF_TITLE_LENGTH));
        errors.check("author_name", validate_name(&self.author_name, MAX_SHELF_AUTHOR_LENGTH));

        let year = match self.publication_year {
            Some(year) => {
                errors.check("publication_year", validate_publication_year(year));
                year
            },
            None => {
                errors.add("publication_year", "This field is required.");
                0
            },
        };

        errors.into_result().map(|()| CleanShelfBook {
            title: self.title.trim().to_string(),
            author: self.author_name.trim().to_string(),
            publication_year: year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_validation() {
        let form = ShelfBookForm {
            title: " Excession ".into(),
            author_name: "Iain M. Banks".into(),
            publication_year: Some(1996),
        };
        let clean = form.validate().unwrap();
        assert_eq!(clean.title, "Excession");
        assert_eq!(clean.publication_year, 1996);

        let errors = ShelfBookForm::default().validate().unwrap_err();
        assert!(errors.contains("title"));
        assert!(errors.contains("author_name"));
        assert!(errors.contains("publication_year"));
    }

    #[test]
    fn test_shelf_titles_allow_two_hundred_chars() {
        let form = ShelfBookForm {
            title: "x".repeat(MAX_SHELF_TITLE_LENGTH),
            author_name: "Anon".into(),
            publication_year: Some(2001),
        };
        assert!(form.validate().is_ok());

        let too_long = ShelfBookForm {
            title: "x".repeat(MAX_SHELF_TITLE_LENGTH + 1),
            ..form
        };
        assert!(too_long.validate().unwrap_err().contains("title"));
    }

    #[test]
    fn test_form_accepts_author_alias() {
        let form: ShelfBookForm =
            serde_json::from_str(r#"{"title":"Kindred","author":"Octavia E. Butler","publication_year":1979}"#)
                .unwrap();
        assert_eq!(form.author_name, "Octavia E. Butler");
    }
}
