//! Revoke the presented bearer token

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::session;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutCommand {
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<bool, LogoutError>> for LogoutCommand {}

impl crate::cqrs::middleware::Command for LogoutCommand {}

impl From<LogoutError> for AppError {
    fn from(err: LogoutError) -> Self {
        match err {
            LogoutError::Database(e) => AppError::Database(e),
        }
    }
}

/// Returns whether a session was actually removed
#[tracing::instrument(skip(pool, command))]
pub async fn handle(pool: SqlitePool, command: LogoutCommand) -> Result<bool, LogoutError> {
    let revoked = session::revoke(&pool, &command.token).await?;
    tracing::info!(revoked, "Logout");
    Ok(revoked)
}
