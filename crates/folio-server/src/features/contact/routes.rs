//! `POST /api/v1/contact` - validate and echo a contact form

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use super::commands::SubmitContactCommand;
use crate::api::extract::Json;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::error::AppError;

pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/contact", post(submit_contact))
}

#[tracing::instrument(skip(command))]
async fn submit_contact(Json(command): Json<SubmitContactCommand>) -> Result<Response, AppError> {
    let message = super::commands::submit::handle(command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(message))).into_response())
}
