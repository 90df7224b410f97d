//! Catalog service: summaries, listings, detail pages and catalog records

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetail, AuthorFields},
        book::{display_genre, Book, BookDetail, BookSummary, CreateBook},
        book_instance::{BookInstance, CreateBookInstance, LoanStatus, UpdateBookInstance},
        genre::{CreateGenre, Genre},
        language::{CreateLanguage, LanguageView, LanguageVocabulary, VocabularyEntry},
        page::{PageInfo, PageRequest, PAGE_SIZE},
    },
    repository::Repository,
};

/// Title filter of the public book listing
pub const BOOK_LISTING_FILTER: &str = "were";
/// Records shown by the book and author listings
pub const LISTING_CAP: i64 = 5;
/// Substring counted on the home page
pub const SUMMARY_NEEDLE: &str = "a";

/// Record counts shown on the home page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genre_with_a: i64,
    pub num_books_with_a: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    vocabulary: Arc<LanguageVocabulary>,
}

impl CatalogService {
    pub fn new(repository: Repository, vocabulary: Arc<LanguageVocabulary>) -> Self {
        Self {
            repository,
            vocabulary,
        }
    }

    /// Counts of the main catalog records
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        Ok(CatalogCounts {
            num_books: self.repository.books.count().await?,
            num_instances: self.repository.book_instances.count().await?,
            num_instances_available: self
                .repository
                .book_instances
                .count_by_status(LoanStatus::Available)
                .await?,
            num_authors: self.repository.authors.count().await?,
            num_genre_with_a: self
                .repository
                .genres
                .count_name_contains(SUMMARY_NEEDLE)
                .await?,
            num_books_with_a: self
                .repository
                .books
                .count_title_contains(SUMMARY_NEEDLE)
                .await?,
        })
    }

    /// Up to five books with "were" in the title
    pub async fn list_books(&self, page: Option<i64>) -> AppResult<(Vec<BookSummary>, PageInfo)> {
        let matching = self
            .repository
            .books
            .count_title_contains(BOOK_LISTING_FILTER)
            .await?;
        let (window, info) = PageRequest::new(page, PAGE_SIZE)
            .capped(LISTING_CAP)
            .resolve(matching)?;

        let books = self
            .repository
            .books
            .find_by_title_contains(BOOK_LISTING_FILTER, window)
            .await?;
        Ok((books, info))
    }

    /// Up to five authors in default order
    pub async fn list_authors(&self, page: Option<i64>) -> AppResult<(Vec<Author>, PageInfo)> {
        let total = self.repository.authors.count().await?;
        let (window, info) = PageRequest::new(page, PAGE_SIZE)
            .capped(LISTING_CAP)
            .resolve(total)?;

        let authors = self.repository.authors.list(window).await?;
        Ok((authors, info))
    }

    /// Book with author, language, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let language = match book.language_id {
            Some(language_id) => {
                let language = self.repository.languages.get_by_id(language_id).await?;
                Some(self.vocabulary.view(&language))
            }
            None => None,
        };
        let genres = self.repository.genres.list_for_book(id).await?;
        let instances = self.repository.book_instances.list_for_book(id).await?;

        let genre_names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
        Ok(BookDetail {
            display_genre: display_genre(&genre_names),
            book,
            author,
            language,
            genres,
            instances,
        })
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Author with the books they wrote
    pub async fn get_author_detail(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetail { author, books })
    }

    pub async fn create_author(&self, fields: &AuthorFields) -> AppResult<Author> {
        let author = self.repository.authors.create(fields).await?;
        tracing::info!("Created author {} ({})", author.id, author);
        Ok(author)
    }

    pub async fn update_author(&self, id: i32, fields: &AuthorFields) -> AppResult<Author> {
        let author = self.repository.authors.update(id, fields).await?;
        tracing::info!("Updated author {} ({})", author.id, author);
        Ok(author)
    }

    /// Delete an author; their books stay with no author
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }

    // =========================================================================
    // Catalog records
    // =========================================================================

    pub async fn create_genre(&self, genre: &CreateGenre) -> AppResult<Genre> {
        genre.validate()?;
        self.repository.genres.create(genre).await
    }

    pub fn vocabulary(&self) -> Vec<VocabularyEntry> {
        self.vocabulary.entries()
    }

    /// Create a language record for a vocabulary code
    pub async fn create_language(&self, request: &CreateLanguage) -> AppResult<LanguageView> {
        let code = request
            .code
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .unwrap_or_else(|| self.vocabulary.default_code().to_string());

        if !self.vocabulary.contains(&code) {
            return Err(AppError::Validation(format!("Unknown language code {}", code)));
        }

        let language = self.repository.languages.create(&code).await?;
        Ok(self.vocabulary.view(&language))
    }

    pub async fn create_book(&self, book: &CreateBook) -> AppResult<Book> {
        book.validate()?;
        let created = self.repository.books.create(book).await?;
        tracing::info!("Created book {} ({})", created.id, created);
        Ok(created)
    }

    pub async fn create_book_instance(&self, instance: &CreateBookInstance) -> AppResult<BookInstance> {
        instance.validate()?;
        let created = self.repository.book_instances.create(instance).await?;
        tracing::info!("Created book instance {} with status {}", created.id, created.status);
        Ok(created)
    }

    /// Set status, due date and borrower; any status may follow any other
    pub async fn update_book_instance(
        &self,
        id: Uuid,
        update: &UpdateBookInstance,
    ) -> AppResult<BookInstance> {
        let updated = self.repository.book_instances.update(id, update).await?;
        tracing::info!("Book instance {} is now {}", id, updated.status);
        Ok(updated)
    }
}
