//! Replace a user's permission groups (superuser only)

use folio_common::types::GroupName;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::load_principal;
use crate::error::AppError;
use crate::features::accounts::types::{user_id_by_username, PermissionSummary};
use crate::features::shared::validation::FieldErrors;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetUserGroupsCommand {
    #[serde(skip)]
    pub username: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SetUserGroupsError {
    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Group '{0}' has not been set up")]
    GroupMissing(GroupName),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<PermissionSummary, SetUserGroupsError>> for SetUserGroupsCommand {}

impl crate::cqrs::middleware::Command for SetUserGroupsCommand {}

impl SetUserGroupsCommand {
    /// Parse group names, collecting every unknown one
    pub fn parsed_groups(&self) -> Result<Vec<GroupName>, FieldErrors> {
        let mut errors = FieldErrors::default();
        let mut groups = Vec::new();
        for name in &self.groups {
            match name.parse::<GroupName>() {
                Ok(group) if !groups.contains(&group) => groups.push(group),
                Ok(_) => {},
                Err(e) => errors.add("groups", e.to_string()),
            }
        }
        errors.into_result().map(|()| groups)
    }
}

impl From<SetUserGroupsError> for AppError {
    fn from(err: SetUserGroupsError) -> Self {
        match err {
            SetUserGroupsError::UserNotFound(name) => AppError::NotFound(format!("User '{name}' not found")),
            SetUserGroupsError::Validation(fields) => AppError::validation(fields),
            SetUserGroupsError::GroupMissing(group) => AppError::BadRequest(format!(
                "Group '{group}' has not been set up; run setup-groups first"
            )),
            SetUserGroupsError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(username = %command.username))]
pub async fn handle(
    pool: SqlitePool,
    command: SetUserGroupsCommand,
) -> Result<PermissionSummary, SetUserGroupsError> {
    let groups = command.parsed_groups()?;
    let user_id = user_id_by_username(&pool, &command.username)
        .await?
        .ok_or_else(|| SetUserGroupsError::UserNotFound(command.username.clone()))?;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM user_groups WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for group in &groups {
        let inserted = sqlx::query(
            "INSERT INTO user_groups (user_id, group_id) SELECT ?, id FROM auth_groups WHERE name = ?",
        )
        .bind(user_id)
        .bind(group.as_str())
        .execute(&mut *tx)
        .await?;
        if inserted.rows_affected() == 0 {
            return Err(SetUserGroupsError::GroupMissing(*group));
        }
    }
    tx.commit().await?;

    tracing::info!(user_id, groups = ?groups, "User groups replaced");

    load_principal(&pool, user_id)
        .await?
        .map(PermissionSummary::from)
        .ok_or(SetUserGroupsError::UserNotFound(command.username))
}
