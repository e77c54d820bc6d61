//! Create a member account and log it in

use chrono::{NaiveDate, Utc};
use folio_common::types::Role;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::password::{check_new_password, hash_password, PasswordError};
use crate::auth::session;
use crate::config::DEFAULT_SESSION_TTL_HOURS;
use crate::error::AppError;
use crate::features::accounts::types::{fetch_profile, AuthResponse};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{validate_email, validate_username, FieldErrors};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterCommand {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Lifetime of the issued token; the configured default when unset
    #[serde(skip)]
    pub session_ttl_hours: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("User {0} vanished after registration")]
    Missing(i64),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<AuthResponse, RegisterError>> for RegisterCommand {}

impl crate::cqrs::middleware::Command for RegisterCommand {}

impl RegisterCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check("username", validate_username(&self.username));
        errors.check("email", validate_email(&self.email));
        check_new_password(&mut errors, &self.password1, &self.password2, &self.username);
        errors.into_result()
    }
}

impl From<RegisterError> for AppError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::Validation(fields) => AppError::validation(fields),
            RegisterError::DuplicateUsername(_) => {
                AppError::Conflict("A user with that username already exists.".to_string())
            },
            RegisterError::Missing(id) => AppError::Internal(format!("User {id} vanished after registration")),
            RegisterError::Password(e) => AppError::Internal(e.to_string()),
            RegisterError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(username = %command.username))]
pub async fn handle(pool: SqlitePool, command: RegisterCommand) -> Result<AuthResponse, RegisterError> {
    command.validate()?;

    let password_hash = hash_password(&command.password1).await?;
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, first_name, last_name, date_of_birth, role, password_hash, date_joined)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&command.username)
    .bind(command.email.trim())
    .bind(command.first_name.trim())
    .bind(command.last_name.trim())
    .bind(command.date_of_birth)
    .bind(Role::Member.as_str())
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| map_unique_violation(e, RegisterError::DuplicateUsername(command.username.clone()), Into::into))?;

    let ttl_hours = command.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS);
    let issued = session::issue(&pool, id, ttl_hours).await?;
    let user = fetch_profile(&pool, id).await?.ok_or(RegisterError::Missing(id))?;

    tracing::info!(user_id = id, "User registered");
    Ok(AuthResponse {
        user,
        token: issued.token,
        expires_at: issued.expires_at,
    })
}
