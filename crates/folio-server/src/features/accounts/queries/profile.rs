//! The caller's own profile

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::features::accounts::types::{fetch_profile, UserProfile};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProfileQuery {
    pub user_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetProfileError {
    #[error("User {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UserProfile, GetProfileError>> for GetProfileQuery {}

impl crate::cqrs::middleware::Query for GetProfileQuery {}

impl From<GetProfileError> for AppError {
    fn from(err: GetProfileError) -> Self {
        match err {
            GetProfileError::NotFound(id) => AppError::NotFound(format!("User {id} not found")),
            GetProfileError::Database(e) => AppError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetProfileQuery) -> Result<UserProfile, GetProfileError> {
    fetch_profile(&pool, query.user_id)
        .await?
        .ok_or(GetProfileError::NotFound(query.user_id))
}
