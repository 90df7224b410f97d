//! Book (catalog title) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    author::Author, book_instance::BookInstance, genre::Genre, language::LanguageView,
};

/// Number of genres shown by [`display_genre`]
pub const DISPLAY_GENRE_LIMIT: usize = 3;

/// Comma-joined names of the first three genres
pub fn display_genre<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .take(DISPLAY_GENRE_LIMIT)
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full book model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub language_id: Option<i32>,
}

impl Book {
    /// Detail page path for this book
    pub fn absolute_url(&self) -> String {
        format!("/book/{}", self.id)
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Internal row structure for list queries
#[derive(Debug, Clone, FromRow)]
pub struct BookSummaryRow {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
    pub publication_date: NaiveDate,
    pub genre_names: Vec<String>,
}

impl From<BookSummaryRow> for BookSummary {
    fn from(row: BookSummaryRow) -> Self {
        BookSummary {
            display_genre: display_genre(&row.genre_names),
            id: row.id,
            title: row.title,
            author_id: row.author_id,
            author_name: row.author_name,
            publication_date: row.publication_date,
        }
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    /// "last_name, first_name"
    pub author_name: Option<String>,
    pub publication_date: NaiveDate,
    pub display_genre: String,
}

/// Book with its relations, for the detail page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub language: Option<LanguageView>,
    pub genres: Vec<Genre>,
    pub display_genre: String,
    pub instances: Vec<BookInstance>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub author_id: Option<i32>,
    #[validate(length(min = 1, message = "Summary is required"))]
    pub summary: String,
    #[validate(length(min = 1, max = 20, message = "ISBN must be 1-20 characters"))]
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub language_id: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}
