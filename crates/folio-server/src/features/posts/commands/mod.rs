pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreatePostCommand, CreatePostError};
pub use delete::{DeletePostCommand, DeletePostError};
pub use update::{UpdatePostCommand, UpdatePostError};
