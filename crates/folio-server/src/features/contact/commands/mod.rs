pub mod submit;

pub use submit::{ContactMessage, SubmitContactCommand, SubmitContactError};
