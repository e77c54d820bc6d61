//! Authentication and authorization
//!
//! - [`password`]: Argon2id hashing and the password policy
//! - [`session`]: opaque bearer tokens stored as SHA-256 digests
//! - [`extractor`]: `CurrentUser` / `MaybeUser` request extractors
//! - [`access`]: the static `(entity, action)` access matrix

pub mod access;
pub mod extractor;
pub mod password;
pub mod session;

pub use access::{authorize, AccessDenied, Action, Entity, Requirement};
pub use extractor::{CurrentUser, MaybeUser};

use folio_common::types::{PermissionCode, Role};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::BTreeSet;

/// The authenticated caller, with everything access checks need
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub is_superuser: bool,
    pub is_active: bool,
    pub groups: Vec<String>,
    /// Union of the permissions granted by `groups`
    pub permissions: BTreeSet<PermissionCode>,
}

impl Principal {
    pub fn has_permission(&self, code: PermissionCode) -> bool {
        self.permissions.contains(&code)
    }
}

#[derive(sqlx::FromRow)]
struct PrincipalRow {
    id: i64,
    username: String,
    role: String,
    is_superuser: bool,
    is_active: bool,
}

fn decode_error(e: folio_common::FolioError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

/// Load a principal with its groups and effective permissions
pub async fn load_principal(pool: &SqlitePool, user_id: i64) -> Result<Option<Principal>, sqlx::Error> {
    let Some(row) = sqlx::query_as::<_, PrincipalRow>(
        "SELECT id, username, role, is_superuser, is_active FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let groups: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT g.name
        FROM auth_groups g
        JOIN user_groups ug ON ug.group_id = g.id
        WHERE ug.user_id = ?
        ORDER BY g.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let codenames: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT gp.codename
        FROM group_permissions gp
        JOIN user_groups ug ON ug.group_id = gp.group_id
        WHERE ug.user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let permissions = codenames
        .iter()
        .map(|c| c.parse::<PermissionCode>())
        .collect::<Result<BTreeSet<_>, _>>()
        .map_err(decode_error)?;

    Ok(Some(Principal {
        id: row.id,
        username: row.username,
        role: row.role.parse().map_err(decode_error)?,
        is_superuser: row.is_superuser,
        is_active: row.is_active,
        groups,
        permissions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::features::shared::test_helpers::TestUser;
    use crate::seed::setup_groups;
    use folio_common::types::GroupName;

    #[tokio::test]
    async fn test_load_principal_merges_group_permissions() {
        let pool = create_memory_pool().await.unwrap();
        setup_groups(&pool).await.unwrap();
        let user = TestUser::new("editor")
            .with_role(Role::Librarian)
            .with_groups(&[GroupName::Viewers, GroupName::Editors])
            .insert(&pool)
            .await
            .unwrap();

        let principal = load_principal(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(principal.username, "editor");
        assert_eq!(principal.role, Role::Librarian);
        assert_eq!(principal.groups, vec!["Editors", "Viewers"]);
        assert!(principal.has_permission(PermissionCode::CanEdit));
        assert!(!principal.has_permission(PermissionCode::CanDelete));
        assert_eq!(principal.permissions.len(), 3);
    }

    #[tokio::test]
    async fn test_load_principal_missing_user() {
        let pool = create_memory_pool().await.unwrap();
        assert!(load_principal(&pool, 404).await.unwrap().is_none());
    }
}
