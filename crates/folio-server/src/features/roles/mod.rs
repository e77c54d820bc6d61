//! Role-restricted landing pages (Admin, Librarian, Member)

pub mod routes;
pub mod types;

pub use routes::roles_routes;
pub use types::{role_page, RolePage};
