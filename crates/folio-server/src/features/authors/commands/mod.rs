pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateAuthorCommand, CreateAuthorError};
pub use delete::{DeleteAuthorCommand, DeleteAuthorError};
pub use update::{UpdateAuthorCommand, UpdateAuthorError};
