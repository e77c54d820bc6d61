//! Author routes
//!
//! Reads are open; writes need an authenticated caller.
//!
//! - `GET /api/v1/authors`, `POST /api/v1/authors`
//! - `GET|PUT|PATCH|DELETE /api/v1/authors/:id`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use sqlx::SqlitePool;

use super::commands::{CreateAuthorCommand, DeleteAuthorCommand, UpdateAuthorCommand};
use super::queries::{GetAuthorQuery, ListAuthorsQuery};
use crate::api::extract::{Json, Path};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::auth::{authorize, Action, CurrentUser, Entity, MaybeUser};
use crate::error::AppError;

pub fn authors_routes() -> Router<AppState> {
    Router::new()
        .route("/authors", get(list_authors).post(create_author))
        .route(
            "/authors/:id",
            get(get_author)
                .put(replace_author)
                .patch(patch_author)
                .delete(delete_author),
        )
}

#[tracing::instrument(skip(pool, user, command))]
async fn create_author(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Json(command): Json<CreateAuthorCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::Author, Action::Create, None)?;

    let author = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(author))).into_response())
}

async fn replace_author(
    state: State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(command): Json<UpdateAuthorCommand>,
) -> Result<Response, AppError> {
    update_author(state, user, id, command, false).await
}

async fn patch_author(
    state: State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(command): Json<UpdateAuthorCommand>,
) -> Result<Response, AppError> {
    update_author(state, user, id, command, true).await
}

#[tracing::instrument(skip(pool, user, command))]
async fn update_author(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    id: i64,
    mut command: UpdateAuthorCommand,
    partial: bool,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::Author, Action::Update, None)?;

    command.id = id;
    command.partial = partial;
    let author = super::commands::update::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(author))).into_response())
}

#[tracing::instrument(skip(pool, user))]
async fn delete_author(
    State(pool): State<SqlitePool>,
    user: MaybeUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(user.as_ref(), Entity::Author, Action::Delete, None)?;

    super::commands::delete::handle(pool, DeleteAuthorCommand { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_authors(State(pool): State<SqlitePool>) -> Result<Response, AppError> {
    let authors = super::queries::list::handle(pool, ListAuthorsQuery::default()).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(authors))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_author(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let author = super::queries::get::handle(pool, GetAuthorQuery { id }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(author))).into_response())
}
