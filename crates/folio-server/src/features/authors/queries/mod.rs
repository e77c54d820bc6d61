pub mod get;
pub mod list;

pub use get::{GetAuthorError, GetAuthorQuery};
pub use list::{ListAuthorsError, ListAuthorsQuery};
