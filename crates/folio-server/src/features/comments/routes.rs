//! Comment routes
//!
//! - `POST /api/v1/posts/:id/comments` - authenticated
//! - `PUT|DELETE /api/v1/comments/:id` - comment author only

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{post, put},
    Router,
};
use sqlx::SqlitePool;

use super::commands::{CreateCommentCommand, DeleteCommentCommand, UpdateCommentCommand};
use super::types::comment_owner;
use crate::api::extract::{Json, Path};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::auth::{authorize, Action, CurrentUser, Entity};
use crate::error::AppError;

pub fn comments_routes() -> Router<AppState> {
    Router::new()
        .route("/posts/:id/comments", post(create_comment))
        .route("/comments/:id", put(update_comment).delete(delete_comment))
}

async fn authorize_owner(
    pool: &SqlitePool,
    user: &CurrentUser,
    comment_id: i64,
    action: Action,
) -> Result<(), AppError> {
    let owner = comment_owner(pool, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {comment_id} not found")))?;
    authorize(Some(&user.0), Entity::Comment, action, Some(owner))?;
    Ok(())
}

#[tracing::instrument(skip(pool, user, command), fields(user_id = user.0.id))]
async fn create_comment(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(post_id): Path<i64>,
    Json(mut command): Json<CreateCommentCommand>,
) -> Result<Response, AppError> {
    authorize(Some(&user.0), Entity::Comment, Action::Create, None)?;

    command.post_id = post_id;
    command.author_id = user.0.id;
    let comment = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(comment))).into_response())
}

#[tracing::instrument(skip(pool, user, command), fields(user_id = user.0.id))]
async fn update_comment(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(mut command): Json<UpdateCommentCommand>,
) -> Result<Response, AppError> {
    authorize_owner(&pool, &user, id, Action::Update).await?;

    command.id = id;
    let comment = super::commands::update::handle(pool, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(comment))).into_response())
}

#[tracing::instrument(skip(pool, user), fields(user_id = user.0.id))]
async fn delete_comment(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize_owner(&pool, &user, id, Action::Delete).await?;

    super::commands::delete::handle(pool, DeleteCommentCommand { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
