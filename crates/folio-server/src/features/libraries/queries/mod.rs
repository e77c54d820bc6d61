pub mod books_by_author;
pub mod get;
pub mod librarian;
pub mod library_books;
pub mod list;

pub use books_by_author::{BooksByAuthorError, BooksByAuthorQuery};
pub use get::{GetLibraryError, GetLibraryQuery};
pub use librarian::{LibrarianForLibraryError, LibrarianForLibraryQuery};
pub use library_books::{LibraryBooksError, LibraryBooksQuery};
pub use list::{ListLibrariesError, ListLibrariesQuery};
