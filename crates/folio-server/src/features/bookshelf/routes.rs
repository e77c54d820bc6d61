//! Bookshelf routes
//!
//! Listing is open. Everything else is gated on a named permission granted
//! through group membership (`can_view`, `can_create`, `can_edit`,
//! `can_delete`). The permission check runs before the entry is looked up.
//!
//! - `GET|POST /api/v1/shelf/books`
//! - `GET|PUT|DELETE /api/v1/shelf/books/:id`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use sqlx::SqlitePool;

use super::commands::{CreateShelfBookCommand, DeleteShelfBookCommand, UpdateShelfBookCommand};
use super::queries::{GetShelfBookQuery, ListShelfBooksQuery};
use crate::api::extract::{Json, Path};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::auth::{authorize, Action, CurrentUser, Entity, MaybeUser};
use crate::error::AppError;

pub fn bookshelf_routes() -> Router<AppState> {
    Router::new()
        .route("/shelf/books", get(list_shelf_books).post(create_shelf_book))
        .route(
            "/shelf/books/:id",
            get(get_shelf_book).put(update_shelf_book).delete(delete_shelf_book),
        )
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, user, command))]
async fn create_shelf_book(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Json(command): Json<CreateShelfBookCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::ShelfBook, Action::Create, None)?;

    let book = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(book))).into_response())
}

#[tracing::instrument(skip(pool, user, command))]
async fn update_shelf_book(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(mut command): Json<UpdateShelfBookCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::ShelfBook, Action::Update, None)?;

    command.id = id;
    let book = super::commands::update::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(book))).into_response())
}

#[tracing::instrument(skip(pool, user))]
async fn delete_shelf_book(
    State(pool): State<SqlitePool>,
    user: MaybeUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(user.as_ref(), Entity::ShelfBook, Action::Delete, None)?;

    super::commands::delete::handle(pool, DeleteShelfBookCommand { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool))]
async fn list_shelf_books(State(pool): State<SqlitePool>) -> Result<Response, AppError> {
    let books = super::queries::list::handle(pool, ListShelfBooksQuery::default()).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(books))).into_response())
}

#[tracing::instrument(skip(pool, user))]
async fn get_shelf_book(
    State(pool): State<SqlitePool>,
    user: MaybeUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    authorize(user.as_ref(), Entity::ShelfBook, Action::Retrieve, None)?;

    let book = super::queries::get::handle(pool, GetShelfBookQuery { id }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(book))).into_response())
}
