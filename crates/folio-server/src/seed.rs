//! Fixture data: permission groups, sample catalog and users
//!
//! Everything here is idempotent by name so the CLI subcommands can be run
//! repeatedly against the same database.

use chrono::Utc;
use folio_common::types::{GroupName, Role};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;

use crate::auth::password::{hash_password, password_problems, PasswordError};
use crate::features::shared::error_helpers::is_unique_violation;
use crate::features::shared::validation::{validate_email, validate_username};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("User '{0}' already exists")]
    DuplicateUser(String),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type SeedResult<T> = Result<T, SeedError>;

/// Create the Viewers, Editors and Admins groups and reset their permissions
///
/// Returns the groups that did not exist before.
#[tracing::instrument(skip(pool))]
pub async fn setup_groups(pool: &SqlitePool) -> SeedResult<Vec<GroupName>> {
    let mut created = Vec::new();
    let mut tx = pool.begin().await?;

    for group in GroupName::ALL {
        let inserted = sqlx::query("INSERT INTO auth_groups (name) VALUES (?) ON CONFLICT (name) DO NOTHING")
            .bind(group.as_str())
            .execute(&mut *tx)
            .await?;
        if inserted.rows_affected() > 0 {
            created.push(group);
        }

        let group_id: i64 = sqlx::query_scalar("SELECT id FROM auth_groups WHERE name = ?")
            .bind(group.as_str())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM group_permissions WHERE group_id = ?")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
        for permission in group.grants() {
            sqlx::query("INSERT INTO group_permissions (group_id, codename) VALUES (?, ?)")
                .bind(group_id)
                .bind(permission.codename())
                .execute(&mut *tx)
                .await?;
        }
        tracing::debug!(group = %group, permissions = group.grants().len(), "Group permissions set");
    }

    tx.commit().await?;
    tracing::info!(created = created.len(), "Permission groups ready");
    Ok(created)
}

/// Counts of rows created by [`create_sample_data`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleDataReport {
    pub books: usize,
    pub libraries: usize,
    pub librarians: usize,
}

const SAMPLE_BOOKS: [(&str, &str, i32); 4] = [
    ("Book A", "Author One", 2000),
    ("Book B", "Author One", 2005),
    ("Book C", "Author Two", 2010),
    ("Book D", "Author Two", 2015),
];

const SAMPLE_LIBRARIES: [(&str, &[&str], &str); 2] = [
    ("Central Library", &["Book A", "Book B"], "Librarian A"),
    ("Community Library", &["Book C", "Book D"], "Librarian B"),
];

async fn get_or_create_author(conn: &mut SqliteConnection, name: &str) -> Result<i64, sqlx::Error> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM authors WHERE name = ? ORDER BY id LIMIT 1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    match existing {
        Some(id) => Ok(id),
        None => {
            sqlx::query_scalar("INSERT INTO authors (name) VALUES (?) RETURNING id")
                .bind(name)
                .fetch_one(&mut *conn)
                .await
        },
    }
}

async fn get_or_create_book(
    conn: &mut SqliteConnection,
    title: &str,
    author: &str,
    year: i32,
) -> Result<(i64, bool), sqlx::Error> {
    let author_id = get_or_create_author(conn, author).await?;
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM books WHERE title = ? AND author_id = ? ORDER BY id LIMIT 1")
            .bind(title)
            .bind(author_id)
            .fetch_optional(&mut *conn)
            .await?;
    if let Some(id) = existing {
        return Ok((id, false));
    }

    let id = sqlx::query_scalar(
        "INSERT INTO books (title, publication_year, author_id) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(title)
    .bind(year)
    .bind(author_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok((id, true))
}

/// Insert the sample authors, books, libraries and librarians
#[tracing::instrument(skip(pool))]
pub async fn create_sample_data(pool: &SqlitePool) -> SeedResult<SampleDataReport> {
    let mut report = SampleDataReport::default();
    let mut tx = pool.begin().await?;

    let mut book_ids = Vec::new();
    for (title, author, year) in SAMPLE_BOOKS {
        let (id, created) = get_or_create_book(&mut tx, title, author, year).await?;
        if created {
            report.books += 1;
        }
        book_ids.push((title, id));
    }

    for (name, titles, librarian) in SAMPLE_LIBRARIES {
        let inserted = sqlx::query("INSERT INTO libraries (name) VALUES (?) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&mut *tx)
            .await?;
        report.libraries += inserted.rows_affected() as usize;

        let library_id: i64 = sqlx::query_scalar("SELECT id FROM libraries WHERE name = ?")
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

        for &(_, book_id) in book_ids.iter().filter(|(title, _)| titles.contains(title)) {
            sqlx::query("INSERT OR IGNORE INTO library_books (library_id, book_id) VALUES (?, ?)")
                .bind(library_id)
                .bind(book_id)
                .execute(&mut *tx)
                .await?;
        }

        let inserted = sqlx::query(
            "INSERT INTO librarians (name, library_id) VALUES (?, ?) ON CONFLICT (library_id) DO NOTHING",
        )
        .bind(librarian)
        .bind(library_id)
        .execute(&mut *tx)
        .await?;
        report.librarians += inserted.rows_affected() as usize;
    }

    tx.commit().await?;
    tracing::info!(?report, "Sample data ready");
    Ok(report)
}

/// Account details for [`create_user`]
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub superuser: bool,
    pub groups: Vec<GroupName>,
}

/// Create an account from the command line
///
/// Superusers also get `is_staff`. Listed groups must already exist.
#[tracing::instrument(skip(pool, user), fields(username = %user.username))]
pub async fn create_user(pool: &SqlitePool, user: NewUser) -> SeedResult<i64> {
    validate_username(&user.username).map_err(|e| SeedError::InvalidUser(format!("username: {e}")))?;
    validate_email(&user.email).map_err(|e| SeedError::InvalidUser(format!("email: {e}")))?;
    if let Some(problem) = password_problems(&user.password, &user.username).into_iter().next() {
        return Err(SeedError::InvalidUser(format!("password: {problem}")));
    }

    let password_hash = hash_password(&user.password).await?;
    let mut tx = pool.begin().await?;
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, role, is_staff, is_superuser, password_hash, date_joined)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&user.username)
    .bind(user.email.trim())
    .bind(user.role.as_str())
    .bind(user.superuser)
    .bind(user.superuser)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            SeedError::DuplicateUser(user.username.clone())
        } else {
            SeedError::Database(e)
        }
    })?;

    for group in &user.groups {
        sqlx::query("INSERT INTO user_groups (user_id, group_id) SELECT ?, id FROM auth_groups WHERE name = ?")
            .bind(id)
            .bind(group.as_str())
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!(user_id = id, role = %user.role, superuser = user.superuser, "User created");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::load_principal;
    use crate::db::create_memory_pool;
    use folio_common::types::PermissionCode;

    #[tokio::test]
    async fn test_setup_groups_is_idempotent() {
        let pool = create_memory_pool().await.unwrap();

        let first = setup_groups(&pool).await.unwrap();
        assert_eq!(first, GroupName::ALL.to_vec());

        // a stray grant is reset on the next run
        sqlx::query(
            "INSERT INTO group_permissions (group_id, codename) SELECT id, 'can_delete' FROM auth_groups WHERE name = 'Viewers'",
        )
        .execute(&pool)
        .await
        .unwrap();

        let second = setup_groups(&pool).await.unwrap();
        assert!(second.is_empty());

        let viewer_grants: Vec<String> = sqlx::query_scalar(
            "SELECT gp.codename FROM group_permissions gp JOIN auth_groups g ON g.id = gp.group_id WHERE g.name = 'Viewers'",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(viewer_grants, vec!["can_view"]);
    }

    #[tokio::test]
    async fn test_sample_data_is_idempotent() {
        let pool = create_memory_pool().await.unwrap();

        let first = create_sample_data(&pool).await.unwrap();
        assert_eq!(
            first,
            SampleDataReport {
                books: 4,
                libraries: 2,
                librarians: 2,
            }
        );

        let second = create_sample_data(&pool).await.unwrap();
        assert_eq!(second, SampleDataReport::default());

        let authors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&pool)
            .await
            .unwrap();
        let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM library_books")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!((authors, links), (2, 4));
    }

    #[tokio::test]
    async fn test_create_user_with_groups() {
        let pool = create_memory_pool().await.unwrap();
        setup_groups(&pool).await.unwrap();

        let new_user = NewUser {
            username: "curator".into(),
            email: "curator@example.com".into(),
            password: "amber-compass-81".into(),
            role: Role::Librarian,
            superuser: false,
            groups: vec![GroupName::Editors],
        };
        let id = create_user(&pool, new_user.clone()).await.unwrap();

        let principal = load_principal(&pool, id).await.unwrap().unwrap();
        assert_eq!(principal.role, Role::Librarian);
        assert!(principal.has_permission(PermissionCode::CanEdit));
        assert!(!principal.has_permission(PermissionCode::CanDelete));

        assert!(matches!(
            create_user(&pool, new_user).await,
            Err(SeedError::DuplicateUser(_))
        ));
    }

    #[tokio::test]
    async fn test_create_user_rejects_weak_password() {
        let pool = create_memory_pool().await.unwrap();
        let result = create_user(
            &pool,
            NewUser {
                username: "weak".into(),
                email: "weak@example.com".into(),
                password: "123".into(),
                role: Role::Member,
                superuser: false,
                groups: vec![],
            },
        )
        .await;
        assert!(matches!(result, Err(SeedError::InvalidUser(_))));
    }
}
