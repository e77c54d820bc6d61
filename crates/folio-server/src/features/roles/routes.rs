//! Role landing pages
//!
//! - `GET /api/v1/roles/admin`
//! - `GET /api/v1/roles/librarian`
//! - `GET /api/v1/roles/member`
//!
//! Login required; a caller with a different role gets 403.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use folio_common::types::Role;

use super::types::role_page;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;

pub fn roles_routes() -> Router<AppState> {
    Router::new()
        .route("/roles/admin", get(admin_page))
        .route("/roles/librarian", get(librarian_page))
        .route("/roles/member", get(member_page))
}

async fn admin_page(user: CurrentUser) -> Result<Response, AppError> {
    render(user, Role::Admin)
}

async fn librarian_page(user: CurrentUser) -> Result<Response, AppError> {
    render(user, Role::Librarian)
}

async fn member_page(user: CurrentUser) -> Result<Response, AppError> {
    render(user, Role::Member)
}

#[tracing::instrument(skip(user), fields(user_id = user.0.id))]
fn render(user: CurrentUser, role: Role) -> Result<Response, AppError> {
    let CurrentUser(principal) = user;
    let page = role_page(&principal, role)
        .ok_or_else(|| AppError::Forbidden(format!("You do not have permission to view the {role} page.")))?;
    Ok((StatusCode::OK, Json(ApiResponse::success(page))).into_response())
}
