//! Bookshelf: free-standing book entries gated on group permissions

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::bookshelf_routes;
pub use types::ShelfBook;
