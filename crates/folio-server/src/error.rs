//! Server-wide error type and its HTTP mapping
//!
//! Every command and query has its own `thiserror` enum; route handlers
//! convert them into [`AppError`], which knows how to render itself.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::response::ErrorResponse;
use crate::auth::access::AccessDenied;
use crate::db::DbError;
use crate::features::shared::validation::FieldErrors;

/// Application error types
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication credentials were not provided or are invalid")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure carrying per-field messages
    pub fn validation(fields: FieldErrors) -> Self {
        let message = fields.summary();
        AppError::Validation { message, fields }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AccessDenied> for AppError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => AppError::Unauthorized,
            AccessDenied::Forbidden(message) => AppError::Forbidden(message),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                AppError::validation(FieldErrors::single("non_field_errors", e.body_text()))
            },
            JsonRejection::MissingJsonContentType(e) => AppError::UnsupportedMediaType(e.body_text()),
            other if other.status().is_server_error() => AppError::Internal(other.body_text()),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        if rejection.status().is_server_error() {
            AppError::Internal(rejection.body_text())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(e) => AppError::Database(e),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(fields: FieldErrors) -> Self {
        AppError::validation(fields)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::NotFound(message) => ErrorResponse::new("NOT_FOUND", message),
            AppError::Validation { message, fields } => ErrorResponse::with_details(
                "VALIDATION_ERROR",
                message,
                serde_json::to_value(&fields).unwrap_or_default(),
            ),
            AppError::BadRequest(message) => ErrorResponse::new("BAD_REQUEST", message),
            AppError::Unauthorized => ErrorResponse::new(
                "UNAUTHORIZED",
                "Authentication credentials were not provided or are invalid.",
            ),
            AppError::Forbidden(message) => ErrorResponse::new("FORBIDDEN", message),
            AppError::Conflict(message) => ErrorResponse::new("CONFLICT", message),
            AppError::UnsupportedMediaType(message) => {
                ErrorResponse::new("UNSUPPORTED_MEDIA_TYPE", message)
            },
            AppError::Database(e) => {
                tracing::error!(error = ?e, "Database error");
                ErrorResponse::new("INTERNAL_ERROR", "A database error occurred")
            },
            AppError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Alias for Result with AppError
pub type ApiResult<T> = Result<T, AppError>;
