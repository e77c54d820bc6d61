//! Catalog book routes
//!
//! - `GET /api/v1/books` - list (filters, search, ordering)
//! - `GET /api/v1/books/:id` - retrieve
//! - `POST /api/v1/books/create` - create (authenticated)
//! - `PUT|PATCH /api/v1/books/update/:id` - full or partial update (authenticated)
//! - `DELETE /api/v1/books/delete/:id` - delete (authenticated)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use sqlx::SqlitePool;

use super::commands::{CreateBookCommand, DeleteBookCommand, UpdateBookCommand};
use super::queries::{GetBookQuery, ListBooksQuery};
use crate::api::extract::{Json, Path, Query};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::auth::{authorize, Action, CurrentUser, Entity, MaybeUser};
use crate::error::AppError;

pub fn books_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books))
        .route("/books/create", post(create_book))
        .route("/books/:id", get(get_book))
        .route("/books/update/:id", put(replace_book).patch(patch_book))
        .route("/books/delete/:id", delete(delete_book))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, user, command))]
async fn create_book(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Json(command): Json<CreateBookCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::Book, Action::Create, None)?;

    let book = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(book))).into_response())
}

async fn replace_book(
    state: State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(command): Json<UpdateBookCommand>,
) -> Result<Response, AppError> {
    update_book(state, user, id, command, false).await
}

async fn patch_book(
    state: State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(command): Json<UpdateBookCommand>,
) -> Result<Response, AppError> {
    update_book(state, user, id, command, true).await
}

#[tracing::instrument(skip(pool, user, command))]
async fn update_book(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    id: i64,
    mut command: UpdateBookCommand,
    partial: bool,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::Book, Action::Update, None)?;

    command.id = id;
    command.partial = partial;
    let book = super::commands::update::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(book))).into_response())
}

#[tracing::instrument(skip(pool, user))]
async fn delete_book(
    State(pool): State<SqlitePool>,
    user: MaybeUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(user.as_ref(), Entity::Book, Action::Delete, None)?;

    super::commands::delete::handle(pool, DeleteBookCommand { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool))]
async fn list_books(
    State(pool): State<SqlitePool>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Response, AppError> {
    let books = super::queries::list::handle(pool, query).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(books))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_book(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let book = super::queries::get::handle(pool, GetBookQuery { id }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(book))).into_response())
}
