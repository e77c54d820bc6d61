//! Edit the caller's own profile; omitted fields are left unchanged

use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::accounts::types::{fetch_profile, UserProfile};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{validate_email, validate_username, FieldErrors};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileCommand {
    #[serde(skip)]
    pub user_id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_photo: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateProfileError {
    #[error("User {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UserProfile, UpdateProfileError>> for UpdateProfileCommand {}

impl crate::cqrs::middleware::Command for UpdateProfileCommand {}

impl UpdateProfileCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Some(username) = &self.username {
            errors.check("username", validate_username(username));
        }
        if let Some(email) = &self.email {
            errors.check("email", validate_email(email));
        }
        errors.into_result()
    }
}

impl From<UpdateProfileError> for AppError {
    fn from(err: UpdateProfileError) -> Self {
        match err {
            UpdateProfileError::NotFound(id) => AppError::NotFound(format!("User {id} not found")),
            UpdateProfileError::Validation(fields) => AppError::validation(fields),
            UpdateProfileError::DuplicateUsername(_) => {
                AppError::Conflict("A user with that username already exists.".to_string())
            },
            UpdateProfileError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(user_id = command.user_id))]
pub async fn handle(pool: SqlitePool, command: UpdateProfileCommand) -> Result<UserProfile, UpdateProfileError> {
    command.validate()?;

    let result = sqlx::query(
        r#"
        UPDATE users SET
            username = COALESCE(?, username),
            email = COALESCE(?, email),
            first_name = COALESCE(?, first_name),
            last_name = COALESCE(?, last_name),
            date_of_birth = COALESCE(?, date_of_birth),
            profile_photo = COALESCE(?, profile_photo)
        WHERE id = ?
        "#,
    )
    .bind(command.username.as_deref())
    .bind(command.email.as_deref().map(str::trim))
    .bind(command.first_name.as_deref().map(str::trim))
    .bind(command.last_name.as_deref().map(str::trim))
    .bind(command.date_of_birth)
    .bind(command.profile_photo.as_deref())
    .bind(command.user_id)
    .execute(&pool)
    .await
    .map_err(|e| {
        let username = command.username.clone().unwrap_or_default();
        map_unique_violation(e, UpdateProfileError::DuplicateUsername(username), Into::into)
    })?;

    if result.rows_affected() == 0 {
        return Err(UpdateProfileError::NotFound(command.user_id));
    }

    tracing::info!("Profile updated");

    fetch_profile(&pool, command.user_id)
        .await?
        .ok_or(UpdateProfileError::NotFound(command.user_id))
}
