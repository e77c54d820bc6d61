//! Account representations

use chrono::{DateTime, NaiveDate, Utc};
use folio_common::types::Role;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::Principal;

/// Public view of a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo: Option<String>,
    pub role: Role,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    date_of_birth: Option<NaiveDate>,
    profile_photo: Option<String>,
    role: String,
    is_staff: bool,
    is_superuser: bool,
    is_active: bool,
    date_joined: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = sqlx::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(UserProfile {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            profile_photo: row.profile_photo,
            role,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            is_active: row.is_active,
            date_joined: row.date_joined,
        })
    }
}

const USER_SELECT: &str = r#"
    SELECT id, username, email, first_name, last_name, date_of_birth, profile_photo,
           role, is_staff, is_superuser, is_active, date_joined
    FROM users
"#;

pub(crate) async fn fetch_profile(pool: &SqlitePool, id: i64) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(&format!("{USER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(UserProfile::try_from)
        .transpose()
}

/// Id of the user called `username`
pub(crate) async fn user_id_by_username(pool: &SqlitePool, username: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Profile plus a fresh bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// A user's role, groups and effective bookshelf permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSummary {
    pub username: String,
    pub role: Role,
    pub is_superuser: bool,
    pub groups: Vec<String>,
    pub permissions: Vec<String>,
}

impl From<Principal> for PermissionSummary {
    fn from(principal: Principal) -> Self {
        PermissionSummary {
            username: principal.username,
            role: principal.role,
            is_superuser: principal.is_superuser,
            groups: principal.groups,
            permissions: principal
                .permissions
                .iter()
                .map(|p| p.codename().to_string())
                .collect(),
        }
    }
}
