//! Extractors whose rejections render through [`AppError`]
//!
//! Drop-in replacements for axum's `Json`, `Path` and `Query`, so a bad body
//! or URL still answers with the standard error envelope.

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

/// JSON body; a body that does not match the command is a `VALIDATION_ERROR`
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Path parameters; unparsable segments are a `BAD_REQUEST`
#[derive(Debug, Clone, Copy, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Query string; unparsable values are a `BAD_REQUEST`
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Serialize)]
    struct Payload {
        year: i32,
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        page: i64,
    }

    fn app() -> Router {
        Router::new()
            .route("/echo", post(|Json(p): Json<Payload>| async move { Json(p) }))
            .route("/items/:id", get(|Path(id): Path<i64>| async move { id.to_string() }))
            .route("/pages", get(|Query(q): Query<Paging>| async move { q.page.to_string() }))
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    fn json_post(body: &str) -> Request<Body> {
        Request::post("/echo")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let (status, body) = send(json_post(r#"{"year": 1984}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["year"], 1984);
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_validation_error() {
        let (status, body) = send(json_post(r#"{"year": "nineteen"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["details"]["non_field_errors"].is_array());
    }

    #[tokio::test]
    async fn test_malformed_json_and_missing_content_type() {
        let (status, body) = send(json_post("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");

        let request = Request::post("/echo").body(Body::from(r#"{"year": 1}"#)).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_bad_path_and_query_use_envelope() {
        let (status, body) = send(Request::get("/items/abc").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");

        let (status, body) = send(Request::get("/pages?page=first").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}
