//! Feature modules implementing the Folio API
//!
//! This module contains all feature slices following the CQRS (Command Query Responsibility
//! Segregation) pattern. Each feature is organized as a vertical slice with its own
//! commands, queries, and routes.
//!
//! # Features
//!
//! - **accounts**: registration, login/logout, profiles, group and role administration
//! - **authors**: catalog authors
//! - **books**: catalog books linked to an author
//! - **bookshelf**: the simple book list keyed by author name
//! - **comments**: comments on blog posts, owner-gated edits
//! - **contact**: validated contact form (no persistence)
//! - **libraries**: libraries, their books and librarians, plus catalog queries
//! - **posts**: blog posts with tags, pagination and search
//! - **roles**: role-restricted landing pages
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list, search)
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Shared types (if needed)
//!
//! Commands and queries implement the mediator pattern using the `mediator` crate,
//! so the same handlers serve both the HTTP routes and the CLI.

pub mod accounts;
pub mod authors;
pub mod books;
pub mod bookshelf;
pub mod comments;
pub mod contact;
pub mod libraries;
pub mod posts;
pub mod roles;
pub mod shared;

use axum::Router;

use crate::api::AppState;

/// Creates the API router with every feature's routes merged
///
/// Routes carry their full paths (`/books/:id`, `/posts/:id/comments`, ...);
/// the caller nests the result under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(accounts::accounts_routes())
        .merge(authors::authors_routes())
        .merge(books::books_routes())
        .merge(bookshelf::bookshelf_routes())
        .merge(comments::comments_routes())
        .merge(contact::contact_routes())
        .merge(libraries::libraries_routes())
        .merge(posts::posts_routes())
        .merge(roles::roles_routes())
}
