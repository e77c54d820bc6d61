//! Common test utilities for Folio server integration tests
//!
//! Each test gets its own in-memory SQLite database with migrations applied
//! and the permission groups created, wrapped in the real application router.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::TestApp;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new().await;
//!     let token = app.member("alice").await;
//!     let (status, body) = app.get("/api/v1/posts", Some(&token)).await;
//! }
//! ```

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use folio_common::types::{GroupName, Role};
use folio_server::api::{create_router, AppState};
use folio_server::auth::session;
use folio_server::config::Config;
use folio_server::db;
use folio_server::seed::{self, NewUser};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Password used for every test account
pub const TEST_PASSWORD: &str = "amber-compass-81";

pub struct TestApp {
    pub pool: SqlitePool,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = db::create_memory_pool()
            .await
            .expect("Failed to create test database");
        seed::setup_groups(&pool)
            .await
            .expect("Failed to create permission groups");

        let config = Config::default();
        let router = create_router(AppState::new(pool.clone(), &config), &config);
        Self { pool, router }
    }

    /// Create an account and return a bearer token for it
    pub async fn user(&self, username: &str, role: Role, superuser: bool, groups: &[GroupName]) -> String {
        let id = seed::create_user(
            &self.pool,
            NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: TEST_PASSWORD.to_string(),
                role,
                superuser,
                groups: groups.to_vec(),
            },
        )
        .await
        .expect("Failed to create test user");

        session::issue(&self.pool, id, 24)
            .await
            .expect("Failed to issue token")
            .token
    }

    pub async fn member(&self, username: &str) -> String {
        self.user(username, Role::Member, false, &[]).await
    }

    pub async fn superuser(&self, username: &str) -> String {
        self.user(username, Role::Admin, true, &[]).await
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }
}

/// Message of an error envelope
pub fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}
