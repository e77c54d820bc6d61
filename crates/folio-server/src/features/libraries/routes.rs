//! Library routes
//!
//! Reads are open. Creating a library or changing its books or librarian
//! needs the Admin or Librarian role; deleting needs Admin.
//!
//! - `GET|POST /api/v1/libraries`
//! - `GET|DELETE /api/v1/libraries/:id`
//! - `PUT /api/v1/libraries/:id/books`
//! - `PUT /api/v1/libraries/:id/librarian`
//! - `GET /api/v1/catalog/queries/{books-by-author,library-books,librarian}`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use sqlx::SqlitePool;

use super::commands::{AssignLibrarianCommand, CreateLibraryCommand, DeleteLibraryCommand, SetLibraryBooksCommand};
use super::queries::{
    BooksByAuthorQuery, GetLibraryQuery, LibrarianForLibraryQuery, LibraryBooksQuery, ListLibrariesQuery,
};
use crate::api::extract::{Json, Path, Query};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::auth::{authorize, Action, CurrentUser, Entity, MaybeUser};
use crate::error::AppError;

pub fn libraries_routes() -> Router<AppState> {
    Router::new()
        .route("/libraries", get(list_libraries).post(create_library))
        .route("/libraries/:id", get(get_library).delete(delete_library))
        .route("/libraries/:id/books", put(set_library_books))
        .route("/libraries/:id/librarian", put(assign_librarian))
        .route("/catalog/queries/books-by-author", get(books_by_author))
        .route("/catalog/queries/library-books", get(library_books))
        .route("/catalog/queries/librarian", get(librarian_for_library))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, user, command))]
async fn create_library(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Json(command): Json<CreateLibraryCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::Library, Action::Create, None)?;

    let library = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(library))).into_response())
}

#[tracing::instrument(skip(pool, user, command))]
async fn set_library_books(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(mut command): Json<SetLibraryBooksCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::Library, Action::Update, None)?;

    command.library_id = id;
    let library = super::commands::set_books::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(library))).into_response())
}

#[tracing::instrument(skip(pool, user, command))]
async fn assign_librarian(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(mut command): Json<AssignLibrarianCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::Library, Action::Update, None)?;

    command.library_id = id;
    let librarian = super::commands::assign_librarian::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(librarian))).into_response())
}

#[tracing::instrument(skip(pool, user))]
async fn delete_library(
    State(pool): State<SqlitePool>,
    user: MaybeUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(user.as_ref(), Entity::Library, Action::Delete, None)?;

    super::commands::delete::handle(pool, DeleteLibraryCommand { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool))]
async fn list_libraries(State(pool): State<SqlitePool>) -> Result<Response, AppError> {
    let libraries = super::queries::list::handle(pool, ListLibrariesQuery::default()).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(libraries))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_library(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let library = super::queries::get::handle(pool, GetLibraryQuery { id }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(library))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn books_by_author(
    State(pool): State<SqlitePool>,
    Query(query): Query<BooksByAuthorQuery>,
) -> Result<Response, AppError> {
    let books = super::queries::books_by_author::handle(pool, query).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(books))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn library_books(
    State(pool): State<SqlitePool>,
    Query(query): Query<LibraryBooksQuery>,
) -> Result<Response, AppError> {
    let books = super::queries::library_books::handle(pool, query).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(books))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn librarian_for_library(
    State(pool): State<SqlitePool>,
    Query(query): Query<LibrarianForLibraryQuery>,
) -> Result<Response, AppError> {
    let librarian = super::queries::librarian::handle(pool, query).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(librarian))).into_response())
}
