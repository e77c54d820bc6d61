pub mod get;
pub mod list;

pub use get::{GetShelfBookError, GetShelfBookQuery};
pub use list::{ListShelfBooksError, ListShelfBooksQuery};
