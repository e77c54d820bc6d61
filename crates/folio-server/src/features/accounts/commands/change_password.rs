//! Change the caller's password and sign out their other sessions

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::password::{check_new_password, hash_password, verify_password, PasswordError};
use crate::auth::session;
use crate::error::AppError;
use crate::features::shared::validation::FieldErrors;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangePasswordCommand {
    #[serde(skip)]
    pub user_id: i64,
    /// Token of the requesting session; it stays valid
    #[serde(skip)]
    pub current_token: String,
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordChanged {
    pub revoked_sessions: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ChangePasswordError {
    #[error("User {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<PasswordChanged, ChangePasswordError>> for ChangePasswordCommand {}

impl crate::cqrs::middleware::Command for ChangePasswordCommand {}

impl From<ChangePasswordError> for AppError {
    fn from(err: ChangePasswordError) -> Self {
        match err {
            ChangePasswordError::NotFound(id) => AppError::NotFound(format!("User {id} not found")),
            ChangePasswordError::Validation(fields) => AppError::validation(fields),
            ChangePasswordError::Password(e) => AppError::Internal(e.to_string()),
            ChangePasswordError::Database(e) => AppError::Database(e),
        }
    }
}

#[derive(sqlx::FromRow)]
struct Account {
    username: String,
    password_hash: String,
}

#[tracing::instrument(skip(pool, command), fields(user_id = command.user_id))]
pub async fn handle(
    pool: SqlitePool,
    command: ChangePasswordCommand,
) -> Result<PasswordChanged, ChangePasswordError> {
    let account = sqlx::query_as::<_, Account>("SELECT username, password_hash FROM users WHERE id = ?")
        .bind(command.user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(ChangePasswordError::NotFound(command.user_id))?;

    let mut errors = FieldErrors::default();
    let usable = account.password_hash.starts_with('$');
    if !usable || !verify_password(&command.old_password, &account.password_hash).await? {
        errors.add(
            "old_password",
            "Your old password was entered incorrectly. Please enter it again.",
        );
    }
    check_new_password(&mut errors, &command.password1, &command.password2, &account.username);
    errors.into_result()?;

    let password_hash = hash_password(&command.password1).await?;
    sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(command.user_id)
        .execute(&pool)
        .await?;

    let revoked_sessions = session::revoke_others(&pool, command.user_id, &command.current_token).await?;
    tracing::info!(revoked_sessions, "Password changed");

    Ok(PasswordChanged { revoked_sessions })
}
