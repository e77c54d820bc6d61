//! Exchange a username and password for a bearer token

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::password::{verify_password, PasswordError};
use crate::auth::session;
use crate::config::DEFAULT_SESSION_TTL_HOURS;
use crate::error::AppError;
use crate::features::accounts::types::{fetch_profile, AuthResponse};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginCommand {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Lifetime of the issued token; the configured default when unset
    #[serde(skip)]
    pub session_ttl_hours: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<AuthResponse, LoginError>> for LoginCommand {}

impl crate::cqrs::middleware::Command for LoginCommand {}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials => AppError::Unauthorized,
            LoginError::Password(e) => AppError::Internal(e.to_string()),
            LoginError::Database(e) => AppError::Database(e),
        }
    }
}

#[derive(sqlx::FromRow)]
struct Credentials {
    id: i64,
    password_hash: String,
    is_active: bool,
}

#[tracing::instrument(skip(pool, command), fields(username = %command.username))]
pub async fn handle(pool: SqlitePool, command: LoginCommand) -> Result<AuthResponse, LoginError> {
    let credentials = sqlx::query_as::<_, Credentials>(
        "SELECT id, password_hash, is_active FROM users WHERE username = ?",
    )
    .bind(&command.username)
    .fetch_optional(&pool)
    .await?
    .ok_or(LoginError::InvalidCredentials)?;

    // Accounts created without a password carry an unusable "!" hash
    let usable = credentials.password_hash.starts_with('$');
    if !usable || !verify_password(&command.password, &credentials.password_hash).await? {
        tracing::warn!("Login failed");
        return Err(LoginError::InvalidCredentials);
    }
    if !credentials.is_active {
        tracing::warn!(user_id = credentials.id, "Login refused for inactive user");
        return Err(LoginError::InvalidCredentials);
    }

    let purged = session::purge_expired(&pool).await?;
    if purged > 0 {
        tracing::debug!(purged, "Expired sessions removed");
    }

    let ttl_hours = command.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS);
    let issued = session::issue(&pool, credentials.id, ttl_hours).await?;
    let user = fetch_profile(&pool, credentials.id)
        .await?
        .ok_or(LoginError::InvalidCredentials)?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(AuthResponse {
        user,
        token: issued.token,
        expires_at: issued.expires_at,
    })
}
