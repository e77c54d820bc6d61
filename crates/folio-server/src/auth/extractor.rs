//! Request extractors for the calling user
//!
//! Clients authenticate with `Authorization: Bearer <token>` (the DRF style
//! `Token <token>` prefix is accepted too).

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use sqlx::SqlitePool;

use super::{load_principal, session, Principal};
use crate::error::AppError;

/// Token carried in the Authorization header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if scheme.eq_ignore_ascii_case("bearer") || scheme.eq_ignore_ascii_case("token") {
        Some(token)
    } else {
        None
    }
}

async fn principal_from_headers(
    pool: &SqlitePool,
    headers: &HeaderMap,
) -> Result<Option<Principal>, AppError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };

    let Some(user_id) = session::resolve(pool, token).await? else {
        tracing::debug!("Unknown or expired token");
        return Ok(None);
    };

    let principal = load_principal(pool, user_id).await?;
    Ok(principal.filter(|p| p.is_active))
}

/// Authenticated caller; rejects with 401 otherwise
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = SqlitePool::from_ref(state);
        principal_from_headers(&pool, &parts.headers)
            .await?
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional caller; bad or missing credentials mean anonymous
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Principal>);

impl MaybeUser {
    pub fn as_ref(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = SqlitePool::from_ref(state);
        Ok(MaybeUser(principal_from_headers(&pool, &parts.headers).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("Token abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
