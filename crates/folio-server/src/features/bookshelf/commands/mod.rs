pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateShelfBookCommand, CreateShelfBookError};
pub use delete::{DeleteShelfBookCommand, DeleteShelfBookError};
pub use update::{UpdateShelfBookCommand, UpdateShelfBookError};
