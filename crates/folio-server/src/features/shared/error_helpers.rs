//! Database error classification helpers
//!
//! ```rust,ignore
//! use folio_server::features::shared::error_helpers::map_unique_violation;
//!
//! sqlx::query("INSERT INTO libraries (name) VALUES (?)")
//!     .bind(&command.name)
//!     .execute(&pool)
//!     .await
//!     .map_err(|e| map_unique_violation(e, CreateLibraryError::DuplicateName(name), Into::into))?;
//! ```

use sqlx::Error as SqlxError;

/// Check if the error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}

/// Check if the error is a foreign key violation
pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_foreign_key_violation();
    }
    false
}

/// Return `unique_error` on a unique violation, otherwise wrap the original error
pub fn map_unique_violation<E, F>(error: SqlxError, unique_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        unique_error
    } else {
        default_wrapper(error)
    }
}

/// Return `fk_error` on a foreign key violation, otherwise wrap the original error
pub fn map_foreign_key_violation<E, F>(error: SqlxError, fk_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_foreign_key_violation(&error) {
        fk_error
    } else {
        default_wrapper(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Duplicate,
        MissingParent,
        Other,
    }

    #[tokio::test]
    async fn test_unique_violation_is_detected() {
        let pool = create_memory_pool().await.unwrap();
        sqlx::query("INSERT INTO libraries (name) VALUES ('Central')")
            .execute(&pool)
            .await
            .unwrap();

        let err = sqlx::query("INSERT INTO libraries (name) VALUES ('Central')")
            .execute(&pool)
            .await
            .unwrap_err();

        assert!(is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));
        assert_eq!(
            map_unique_violation(err, TestError::Duplicate, |_| TestError::Other),
            TestError::Duplicate
        );
    }

    #[tokio::test]
    async fn test_foreign_key_violation_is_detected() {
        let pool = create_memory_pool().await.unwrap();
        let err = sqlx::query("INSERT INTO books (title, publication_year, author_id) VALUES ('x', 2000, 42)")
            .execute(&pool)
            .await
            .unwrap_err();

        assert_eq!(
            map_foreign_key_violation(err, TestError::MissingParent, |_| TestError::Other),
            TestError::MissingParent
        );
    }

    #[test]
    fn test_non_database_error_passes_through() {
        let mapped = map_unique_violation(SqlxError::RowNotFound, TestError::Duplicate, |_| {
            TestError::Other
        });
        assert_eq!(mapped, TestError::Other);
    }
}
