//! Account routes
//!
//! - `POST /api/v1/accounts/register` - create a member account, returns a token
//! - `POST /api/v1/accounts/login` / `POST /api/v1/accounts/logout`
//! - `GET|PUT /api/v1/accounts/profile` - the caller's profile
//! - `PUT /api/v1/accounts/password` - change password, other sessions are signed out
//! - `GET /api/v1/accounts/permissions` - the caller's role, groups and permissions
//! - `PUT /api/v1/accounts/users/:username/groups` - superuser only
//! - `PUT /api/v1/accounts/users/:username/role` - superuser only

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;
use sqlx::SqlitePool;

use super::commands::{
    ChangePasswordCommand, LoginCommand, LogoutCommand, RegisterCommand, SetUserGroupsCommand, SetUserRoleCommand,
    UpdateProfileCommand,
};
use super::queries::{GetPermissionsQuery, GetProfileQuery};
use crate::api::extract::{Json, Path};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::auth::extractor::bearer_token;
use crate::auth::{authorize, Action, CurrentUser, Entity};
use crate::config::AuthConfig;
use crate::error::AppError;

pub fn accounts_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/register", post(register))
        .route("/accounts/login", post(login))
        .route("/accounts/logout", post(logout))
        .route("/accounts/profile", get(get_profile).put(update_profile))
        .route("/accounts/password", put(change_password))
        .route("/accounts/permissions", get(get_permissions))
        .route("/accounts/users/:username/groups", put(set_user_groups))
        .route("/accounts/users/:username/role", put(set_user_role))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, auth, command))]
async fn register(
    State(pool): State<SqlitePool>,
    State(auth): State<AuthConfig>,
    Json(mut command): Json<RegisterCommand>,
) -> Result<Response, AppError> {
    command.session_ttl_hours = Some(auth.session_ttl_hours);
    let response = super::commands::register::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, auth, command))]
async fn login(
    State(pool): State<SqlitePool>,
    State(auth): State<AuthConfig>,
    Json(mut command): Json<LoginCommand>,
) -> Result<Response, AppError> {
    command.session_ttl_hours = Some(auth.session_ttl_hours);
    let response = super::commands::login::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, user, headers), fields(user_id = user.0.id))]
async fn logout(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?.to_string();
    let revoked = super::commands::logout::handle(pool, LogoutCommand { token }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(json!({ "logged_out": revoked })))).into_response())
}

#[tracing::instrument(skip(pool, user, command), fields(user_id = user.0.id))]
async fn update_profile(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Json(mut command): Json<UpdateProfileCommand>,
) -> Result<Response, AppError> {
    command.user_id = user.0.id;
    let profile = super::commands::update_profile::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(profile))).into_response())
}

#[tracing::instrument(skip(pool, user, headers, command), fields(user_id = user.0.id))]
async fn change_password(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    headers: HeaderMap,
    Json(mut command): Json<ChangePasswordCommand>,
) -> Result<Response, AppError> {
    command.user_id = user.0.id;
    command.current_token = bearer_token(&headers).ok_or(AppError::Unauthorized)?.to_string();
    let changed = super::commands::change_password::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(changed))).into_response())
}

#[tracing::instrument(skip(pool, user, command), fields(user_id = user.0.id))]
async fn set_user_groups(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(username): Path<String>,
    Json(mut command): Json<SetUserGroupsCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::GroupMembership, Action::Update, None)?;

    command.username = username;
    let summary = super::commands::set_groups::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(summary))).into_response())
}

#[tracing::instrument(skip(pool, user, command), fields(user_id = user.0.id))]
async fn set_user_role(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(username): Path<String>,
    Json(mut command): Json<SetUserRoleCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::UserRole, Action::Update, None)?;

    command.username = username;
    let profile = super::commands::set_role::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(profile))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool, user), fields(user_id = user.0.id))]
async fn get_profile(State(pool): State<SqlitePool>, user: CurrentUser) -> Result<Response, AppError> {
    let profile = super::queries::profile::handle(pool, GetProfileQuery { user_id: user.0.id }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(profile))).into_response())
}

#[tracing::instrument(skip(pool, user), fields(user_id = user.0.id))]
async fn get_permissions(State(pool): State<SqlitePool>, user: CurrentUser) -> Result<Response, AppError> {
    let summary =
        super::queries::permissions::handle(pool, GetPermissionsQuery { user_id: user.0.id }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(summary))).into_response())
}
