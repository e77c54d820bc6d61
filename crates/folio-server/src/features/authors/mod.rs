pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::authors_routes;
pub use types::Author;
