//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;
pub mod language;
pub mod page;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetail};
pub use book::{Book, BookDetail, BookSummary};
pub use book_instance::{BookInstance, BookInstanceSummary, LoanStatus};
pub use genre::Genre;
pub use language::{Language, LanguageView, LanguageVocabulary};
pub use page::{PageInfo, PageQuery, PageRequest, Window, PAGE_SIZE};
pub use user::{Permission, User, UserClaims};
