//! Edit a post; omitted fields keep their value, `tags` replaces the set

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::posts::types::{
    fetch_post, normalize_tags, set_post_tags, validate_tags, Post, MAX_POST_TITLE_LENGTH,
};
use crate::features::shared::validation::{validate_name, validate_text, FieldErrors};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostCommand {
    #[serde(skip)]
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdatePostError {
    #[error("Post {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Post, UpdatePostError>> for UpdatePostCommand {}

impl crate::cqrs::middleware::Command for UpdatePostCommand {}

impl UpdatePostCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Some(title) = &self.title {
            errors.check("title", validate_name(title, MAX_POST_TITLE_LENGTH));
        }
        if let Some(content) = &self.content {
            errors.check("content", validate_text(content));
        }
        if let Some(tags) = &self.tags {
            validate_tags(&mut errors, &normalize_tags(tags));
        }
        errors.into_result()
    }
}

impl From<UpdatePostError> for AppError {
    fn from(err: UpdatePostError) -> Self {
        match err {
            UpdatePostError::NotFound(id) => AppError::NotFound(format!("Post {id} not found")),
            UpdatePostError::Validation(fields) => AppError::validation(fields),
            UpdatePostError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(post_id = command.id))]
pub async fn handle(pool: SqlitePool, command: UpdatePostCommand) -> Result<Post, UpdatePostError> {
    command.validate()?;

    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        "UPDATE posts SET title = COALESCE(?, title), content = COALESCE(?, content) WHERE id = ?",
    )
    .bind(command.title.as_deref().map(str::trim))
    .bind(command.content.as_deref())
    .bind(command.id)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(UpdatePostError::NotFound(command.id));
    }

    if let Some(tags) = &command.tags {
        set_post_tags(&mut tx, command.id, &normalize_tags(tags)).await?;
    }
    tx.commit().await?;

    tracing::info!(post_id = command.id, "Post updated");

    fetch_post(&pool, command.id)
        .await?
        .ok_or(UpdatePostError::NotFound(command.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::shared::test_helpers::{TestPost, TestUser};

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let pool = create_memory_pool().await.unwrap();
        let user = TestUser::new("writer").insert(&pool).await.unwrap();
        let post = TestPost::new(&user, "Draft")
            .with_content("Original body")
            .with_tags(&["keep"])
            .insert(&pool)
            .await
            .unwrap();

        let updated = handle(
            pool.clone(),
            UpdatePostCommand {
                id: post.id,
                title: Some("Final".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.content, "Original body");
        assert_eq!(updated.tags, vec!["keep"]);

        let retagged = handle(
            pool,
            UpdatePostCommand {
                id: post.id,
                tags: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(retagged.tags.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let pool = create_memory_pool().await.unwrap();
        let result = handle(
            pool,
            UpdatePostCommand {
                id: 77,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(UpdatePostError::NotFound(77))));
    }
}
