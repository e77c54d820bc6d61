//! Accounts: registration, login sessions, profiles and group/role administration

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::accounts_routes;
pub use types::{AuthResponse, PermissionSummary, UserProfile};
