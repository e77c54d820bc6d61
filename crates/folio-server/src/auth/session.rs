//! Bearer token sessions
//!
//! A login produces a random 64 hex character token. Only its SHA-256 digest
//! is written to `sessions`, so a leaked database cannot be replayed.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use uuid::Uuid;

/// A freshly issued token; the plain value is only ever returned here
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Hex SHA-256 of a token, as stored
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Create a session for `user_id` valid for `ttl_hours`
pub async fn issue(pool: &SqlitePool, user_id: i64, ttl_hours: i64) -> Result<IssuedToken, sqlx::Error> {
    let token = generate_token();
    let now = Utc::now();
    let expires_at = now + Duration::hours(ttl_hours);

    sqlx::query("INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
        .bind(hash_token(&token))
        .bind(user_id)
        .bind(now)
        .bind(expires_at)
        .execute(pool)
        .await?;

    tracing::debug!(user_id, %expires_at, "Session issued");
    Ok(IssuedToken { token, expires_at })
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    user_id: i64,
    expires_at: DateTime<Utc>,
}

/// Resolve a token to its user id; expired sessions are removed on sight
pub async fn resolve(pool: &SqlitePool, token: &str) -> Result<Option<i64>, sqlx::Error> {
    let token_hash = hash_token(token);
    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT user_id, expires_at FROM sessions WHERE token_hash = ?",
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(session) if session.expires_at > Utc::now() => Ok(Some(session.user_id)),
        Some(session) => {
            tracing::debug!(user_id = session.user_id, "Expired session discarded");
            sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
                .bind(&token_hash)
                .execute(pool)
                .await?;
            Ok(None)
        },
        None => Ok(None),
    }
}

/// Delete the session for `token`; returns whether one existed
pub async fn revoke(pool: &SqlitePool, token: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(hash_token(token))
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete every session of `user_id` except the one for `keep_token`
pub async fn revoke_others(pool: &SqlitePool, user_id: i64, keep_token: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = ? AND token_hash <> ?")
        .bind(user_id)
        .bind(hash_token(keep_token))
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Delete all expired sessions
pub async fn purge_expired(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
