//! Catalog books: open reads, authenticated writes

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::books_routes;
pub use types::Book;
