pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateCommentCommand, CreateCommentError};
pub use delete::{DeleteCommentCommand, DeleteCommentError};
pub use update::{UpdateCommentCommand, UpdateCommentError};
