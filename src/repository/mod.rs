//! Repository layer for database operations.
//!
//! Each entity has a store trait naming the queries the services need, and a
//! Postgres implementation. Services only see the traits.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod languages;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::error::AppError;

pub use authors::AuthorsStore;
pub use book_instances::BookInstancesStore;
pub use books::BooksStore;
pub use genres::GenresStore;
pub use languages::LanguagesStore;
pub use users::UsersStore;

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorsStore>,
    pub books: Arc<dyn BooksStore>,
    pub book_instances: Arc<dyn BookInstancesStore>,
    pub genres: Arc<dyn GenresStore>,
    pub languages: Arc<dyn LanguagesStore>,
    pub users: Arc<dyn UsersStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::BookInstancesRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            languages: Arc::new(languages::LanguagesRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool)),
        }
    }
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped
pub(crate) fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Map constraint violations to client errors; everything else stays a database error
pub(crate) fn constraint_error(e: sqlx::Error, what: &str) -> AppError {
    let code = e
        .as_database_error()
        .and_then(|db| db.code())
        .map(|c| c.into_owned());

    match code.as_deref() {
        // foreign_key_violation
        Some("23503") => AppError::Validation(format!("{} references a missing record", what)),
        // unique_violation
        Some("23505") => AppError::Conflict(format!("{} already exists", what)),
        _ => AppError::Database(e),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::{
        authors::MockAuthorsStore, book_instances::MockBookInstancesStore, books::MockBooksStore,
        genres::MockGenresStore, languages::MockLanguagesStore, users::MockUsersStore, Repository,
    };

    /// One mock per store; set expectations, then build the repository
    #[derive(Default)]
    pub struct MockStores {
        pub authors: MockAuthorsStore,
        pub books: MockBooksStore,
        pub book_instances: MockBookInstancesStore,
        pub genres: MockGenresStore,
        pub languages: MockLanguagesStore,
        pub users: MockUsersStore,
    }

    impl MockStores {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn into_repository(self) -> Repository {
            Repository {
                authors: Arc::new(self.authors),
                books: Arc::new(self.books),
                book_instances: Arc::new(self.book_instances),
                genres: Arc::new(self.genres),
                languages: Arc::new(self.languages),
                users: Arc::new(self.users),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("were"), "%were%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_constraint_error_passes_other_errors_through() {
        let err = constraint_error(sqlx::Error::RowNotFound, "Book");
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
