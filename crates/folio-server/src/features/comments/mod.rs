//! Comments on blog posts

pub mod commands;
pub mod routes;
pub mod types;

pub use routes::comments_routes;
pub use types::Comment;
