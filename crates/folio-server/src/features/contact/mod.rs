//! Contact form

pub mod commands;
pub mod routes;

pub use routes::contact_routes;
