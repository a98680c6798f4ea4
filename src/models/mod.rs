//! Data models for the Local Library catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, AuthorForm};
pub use book::{Book, BookForm};
pub use book_instance::{BookInstance, BookInstanceForm, CopyStatus};
pub use genre::{Genre, GenreForm};
