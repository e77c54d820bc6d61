//! Blog posts, tags and search

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::posts_routes;
pub use types::{Post, PostDetail};
