//! Libraries: many-to-many book holdings, one librarian each, role-gated writes

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::libraries_routes;
pub use types::{Librarian, LibraryBook, LibraryDetail, LibrarySummary};
