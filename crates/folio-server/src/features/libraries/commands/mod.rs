pub mod assign_librarian;
pub mod create;
pub mod delete;
pub mod set_books;

pub use assign_librarian::{AssignLibrarianCommand, AssignLibrarianError};
pub use create::{CreateLibraryCommand, CreateLibraryError};
pub use delete::{DeleteLibraryCommand, DeleteLibraryError};
pub use set_books::{SetLibraryBooksCommand, SetLibraryBooksError};
