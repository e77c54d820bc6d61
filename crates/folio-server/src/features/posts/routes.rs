//! Blog post routes
//!
//! - `GET /api/v1/posts` - paginated, newest first
//! - `POST /api/v1/posts` - publish as the caller
//! - `GET /api/v1/posts/:id` - detail with tags and comments
//! - `PUT|DELETE /api/v1/posts/:id` - author only
//! - `GET /api/v1/tags/:name/posts`
//! - `GET /api/v1/search?q=`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use sqlx::SqlitePool;

use super::commands::{CreatePostCommand, DeletePostCommand, UpdatePostCommand};
use super::queries::{GetPostQuery, ListPostsQuery, PostsByTagQuery, SearchPostsQuery};
use super::types::post_owner;
use crate::api::extract::{Json, Path, Query};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::auth::{authorize, Action, CurrentUser, Entity};
use crate::error::AppError;

pub fn posts_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/tags/:name/posts", get(posts_by_tag))
        .route("/search", get(search_posts))
}

/// Load the post's author and check the caller owns it
async fn authorize_owner(
    pool: &SqlitePool,
    user: &CurrentUser,
    post_id: i64,
    action: Action,
) -> Result<(), AppError> {
    let owner = post_owner(pool, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;
    authorize(Some(&user.0), Entity::Post, action, Some(owner))?;
    Ok(())
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, user, command), fields(user_id = user.0.id))]
async fn create_post(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Json(mut command): Json<CreatePostCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::Post, Action::Create, None)?;

    command.author_id = user.0.id;
    let post = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(post))).into_response())
}

#[tracing::instrument(skip(pool, user, command), fields(user_id = user.0.id))]
async fn update_post(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(mut command): Json<UpdatePostCommand>,
) -> Result<Response, AppError> {
    authorize_owner(&pool, &user, id, Action::Update).await?;

    command.id = id;
    let post = super::commands::update::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(post))).into_response())
}

#[tracing::instrument(skip(pool, user), fields(user_id = user.0.id))]
async fn delete_post(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize_owner(&pool, &user, id, Action::Delete).await?;

    super::commands::delete::handle(pool, DeletePostCommand { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool))]
async fn list_posts(
    State(pool): State<SqlitePool>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Response, AppError> {
    let page = super::queries::list::handle(pool, query).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(page.items, meta))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let post = super::queries::get::handle(pool, GetPostQuery { id }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(post))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn posts_by_tag(
    State(pool): State<SqlitePool>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let posts = super::queries::by_tag::handle(pool, PostsByTagQuery { tag: name }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(posts))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn search_posts(
    State(pool): State<SqlitePool>,
    Query(query): Query<SearchPostsQuery>,
) -> Result<Response, AppError> {
    let meta = json!({ "query": query.text().unwrap_or_default() });
    let posts = super::queries::search::handle(pool, query).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(posts, meta))).into_response())
}
