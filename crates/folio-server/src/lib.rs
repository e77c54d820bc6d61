//! Folio Server Library
//!
//! HTTP server for a small library catalog and a blog, with a
//! permission-gated bookshelf.
//!
//! # Overview
//!
//! - **Catalog**: authors, books, libraries and librarians
//! - **Bookshelf**: a flat book list gated by named permissions
//! - **Blog**: posts with tags and comments, edited only by their authors
//! - **Accounts**: registration, token login, profiles, roles and groups
//! - **Configuration**: environment-based configuration management
//! - **Middleware**: CORS, compression and request tracing
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)** architecture:
//!
//! - **Commands** (Write Operations): create, update and delete operations that modify state,
//!   executed via HTTP POST, PUT and DELETE
//! - **Queries** (Read Operations): retrieve operations executed via HTTP GET
//!
//! Every route asks [`auth::authorize`] for a decision before touching the
//! database. The access matrix lives in one table in [`auth::access`].
//!
//! ## Framework Stack
//!
//! - **Axum**: web framework
//! - **SQLx**: SQLite access and migrations
//! - **Tower**: middleware and service abstractions
//!
//! # Example
//!
//! ```no_run
//! use folio_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod seed;

// Re-export commonly used types
pub use error::AppError;
