//! Set a user's library role (superuser only)

use folio_common::types::Role;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::accounts::types::{fetch_profile, user_id_by_username, UserProfile};
use crate::features::shared::validation::FieldErrors;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetUserRoleCommand {
    #[serde(skip)]
    pub username: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SetUserRoleError {
    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UserProfile, SetUserRoleError>> for SetUserRoleCommand {}

impl crate::cqrs::middleware::Command for SetUserRoleCommand {}

impl SetUserRoleCommand {
    pub fn parsed_role(&self) -> Result<Role, FieldErrors> {
        self.role
            .parse()
            .map_err(|e: folio_common::FolioError| FieldErrors::single("role", e.to_string()))
    }
}

impl From<SetUserRoleError> for AppError {
    fn from(err: SetUserRoleError) -> Self {
        match err {
            SetUserRoleError::UserNotFound(name) => AppError::NotFound(format!("User '{name}' not found")),
            SetUserRoleError::Validation(fields) => AppError::validation(fields),
            SetUserRoleError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(username = %command.username))]
pub async fn handle(pool: SqlitePool, command: SetUserRoleCommand) -> Result<UserProfile, SetUserRoleError> {
    let role = command.parsed_role()?;
    let user_id = user_id_by_username(&pool, &command.username)
        .await?
        .ok_or_else(|| SetUserRoleError::UserNotFound(command.username.clone()))?;

    sqlx::query("UPDATE users SET role = ? WHERE id = ?")
        .bind(role.as_str())
        .bind(user_id)
        .execute(&pool)
        .await?;

    tracing::info!(user_id, %role, "User role changed");

    fetch_profile(&pool, user_id)
        .await?
        .ok_or(SetUserRoleError::UserNotFound(command.username))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::shared::test_helpers::TestUser;

    #[tokio::test]
    async fn test_role_change() {
        let pool = create_memory_pool().await.unwrap();
        TestUser::new("marian").insert(&pool).await.unwrap();

        let profile = handle(
            pool.clone(),
            SetUserRoleCommand {
                username: "marian".into(),
                role: "librarian".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(profile.role, Role::Librarian);

        let invalid = handle(
            pool,
            SetUserRoleCommand {
                username: "marian".into(),
                role: "Janitor".into(),
            },
        )
        .await;
        assert!(matches!(invalid, Err(SetUserRoleError::Validation(_))));
    }
}
