//! Role, groups and effective permissions of a user

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::load_principal;
use crate::error::AppError;
use crate::features::accounts::types::PermissionSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPermissionsQuery {
    pub user_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetPermissionsError {
    #[error("User {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<PermissionSummary, GetPermissionsError>> for GetPermissionsQuery {}

impl crate::cqrs::middleware::Query for GetPermissionsQuery {}

impl From<GetPermissionsError> for AppError {
    fn from(err: GetPermissionsError) -> Self {
        match err {
            GetPermissionsError::NotFound(id) => AppError::NotFound(format!("User {id} not found")),
            GetPermissionsError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    query: GetPermissionsQuery,
) -> Result<PermissionSummary, GetPermissionsError> {
    load_principal(&pool, query.user_id)
        .await?
        .map(PermissionSummary::from)
        .ok_or(GetPermissionsError::NotFound(query.user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::seed::setup_groups;
    use crate::features::shared::test_helpers::TestUser;
    use folio_common::types::{GroupName, Role};

    #[tokio::test]
    async fn test_summary_unions_group_permissions() {
        let pool = create_memory_pool().await.unwrap();
        setup_groups(&pool).await.unwrap();
        let user = TestUser::new("staff")
            .with_role(Role::Librarian)
            .with_groups(&[GroupName::Viewers, GroupName::Admins])
            .insert(&pool)
            .await
            .unwrap();

        let summary = handle(pool, GetPermissionsQuery { user_id: user.id }).await.unwrap();
        assert_eq!(summary.role, Role::Librarian);
        assert_eq!(summary.groups, vec!["Admins", "Viewers"]);
        assert_eq!(summary.permissions, vec!["can_view", "can_create", "can_edit", "can_delete"]);
    }
}
