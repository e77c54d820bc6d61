//! Test fixtures for database tests
//!
//! ```rust,ignore
//! let pool = create_memory_pool().await?;
//! let author = TestAuthor::new("Ursula K. Le Guin").insert(&pool).await?;
//! let book = TestBook::new(&author, "The Dispossessed", 1974).insert(&pool).await?;
//! let user = TestUser::new("reader").with_role(Role::Librarian).insert(&pool).await?;
//! ```

use chrono::Utc;
use folio_common::types::{GroupName, Role};
use sqlx::SqlitePool;

use crate::auth::password::hash_password;

/// Builder for test users
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub is_superuser: bool,
    pub is_active: bool,
    pub password: Option<String>,
    pub groups: Vec<GroupName>,
}

impl TestUser {
    pub fn new(username: &str) -> Self {
        Self {
            id: 0,
            username: username.to_string(),
            role: Role::Member,
            is_superuser: false,
            is_active: true,
            password: None,
            groups: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Groups must already exist (see `seed::setup_groups`)
    pub fn with_groups(mut self, groups: &[GroupName]) -> Self {
        self.groups = groups.to_vec();
        self
    }

    pub async fn insert(mut self, pool: &SqlitePool) -> anyhow::Result<Self> {
        let password_hash = match &self.password {
            Some(password) => hash_password(password).await?,
            None => "!".to_string(),
        };

        self.id = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, role, is_superuser, is_staff, is_active, password_hash, date_joined)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&self.username)
        .bind(format!("{}@example.com", self.username))
        .bind(self.role.as_str())
        .bind(self.is_superuser)
        .bind(self.is_superuser)
        .bind(self.is_active)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        for group in &self.groups {
            sqlx::query("INSERT INTO user_groups (user_id, group_id) SELECT ?, id FROM auth_groups WHERE name = ?")
                .bind(self.id)
                .bind(group.as_str())
                .execute(pool)
                .await?;
        }

        Ok(self)
    }
}

/// Builder for test authors
#[derive(Debug, Clone)]
pub struct TestAuthor {
    pub id: i64,
    pub name: String,
}

impl TestAuthor {
    pub fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
        }
    }

    pub async fn insert(mut self, pool: &SqlitePool) -> sqlx::Result<Self> {
        self.id = sqlx::query_scalar("INSERT INTO authors (name) VALUES (?) RETURNING id")
            .bind(&self.name)
            .fetch_one(pool)
            .await?;
        Ok(self)
    }
}

/// Builder for test books
#[derive(Debug, Clone)]
pub struct TestBook {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub publication_year: i32,
}

impl TestBook {
    pub fn new(author: &TestAuthor, title: &str, publication_year: i32) -> Self {
        Self {
            id: 0,
            author_id: author.id,
            title: title.to_string(),
            publication_year,
        }
    }

    pub async fn insert(mut self, pool: &SqlitePool) -> sqlx::Result<Self> {
        self.id = sqlx::query_scalar(
            "INSERT INTO books (title, publication_year, author_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&self.title)
        .bind(self.publication_year)
        .bind(self.author_id)
        .fetch_one(pool)
        .await?;
        Ok(self)
    }
}

/// Builder for test blog posts
#[derive(Debug, Clone)]
pub struct TestPost {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl TestPost {
    pub fn new(author: &TestUser, title: &str) -> Self {
        Self {
            id: 0,
            author_id: author.id,
            title: title.to_string(),
            content: format!("Body of {title}"),
            tags: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub async fn insert(mut self, pool: &SqlitePool) -> sqlx::Result<Self> {
        self.id = sqlx::query_scalar(
            "INSERT INTO posts (title, content, published_date, author_id) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&self.title)
        .bind(&self.content)
        .bind(Utc::now())
        .bind(self.author_id)
        .fetch_one(pool)
        .await?;

        for tag in &self.tags {
            sqlx::query("INSERT INTO tags (name) VALUES (?) ON CONFLICT (name) DO NOTHING")
                .bind(tag)
                .execute(pool)
                .await?;
            sqlx::query("INSERT INTO post_tags (post_id, tag_id) SELECT ?, id FROM tags WHERE name = ?")
                .bind(self.id)
                .bind(tag)
                .execute(pool)
                .await?;
        }

        Ok(self)
    }
}
