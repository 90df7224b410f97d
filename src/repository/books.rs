//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookSummary, BookSummaryRow, CreateBook},
        page::Window,
    },
};

use super::{constraint_error, contains_pattern};

/// Summary columns: author display name and genre names ordered by genre id
const SUMMARY_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id,
           a.last_name || ', ' || a.first_name AS author_name,
           b.publication_date,
           ARRAY(
               SELECT g.name
               FROM book_genres bg
               JOIN genres g ON g.id = bg.genre_id
               WHERE bg.book_id = b.id
               ORDER BY g.id
           ) AS genre_names
    FROM books b
    LEFT JOIN authors a ON a.id = b.author_id
"#;

/// Default book ordering
const SUMMARY_ORDER: &str = "ORDER BY b.title, b.publication_date DESC, b.id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksStore: Send + Sync {
    async fn count(&self) -> AppResult<i64>;

    /// Books whose title contains `needle`, case-insensitive
    async fn count_title_contains(&self, needle: &str) -> AppResult<i64>;

    async fn find_by_title_contains(&self, needle: &str, window: Window) -> AppResult<Vec<BookSummary>>;

    async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Book>;

    /// Insert the book and its genre links in one transaction
    async fn create(&self, book: &CreateBook) -> AppResult<Book>;
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BooksStore for BooksRepository {
    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_title_contains(&self, needle: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE title ILIKE $1")
            .bind(contains_pattern(needle))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_by_title_contains(&self, needle: &str, window: Window) -> AppResult<Vec<BookSummary>> {
        let query = format!(
            "{} WHERE b.title ILIKE $1 {} LIMIT $2 OFFSET $3",
            SUMMARY_SELECT, SUMMARY_ORDER
        );

        let rows = sqlx::query_as::<_, BookSummaryRow>(&query)
            .bind(contains_pattern(needle))
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BookSummary::from).collect())
    }

    async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        let query = format!("{} WHERE b.author_id = $1 {}", SUMMARY_SELECT, SUMMARY_ORDER);

        let rows = sqlx::query_as::<_, BookSummaryRow>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BookSummary::from).collect())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author_id, summary, isbn, publication_date, language_id
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author_id, summary, isbn, publication_date, language_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, author_id, summary, isbn, publication_date, language_id
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.publication_date)
        .bind(book.language_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| constraint_error(e, "Book"))?;

        if !book.genre_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO book_genres (book_id, genre_id)
                SELECT $1, UNNEST($2::int4[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(created.id)
            .bind(&book.genre_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| constraint_error(e, "Book genre"))?;
        }

        tx.commit().await?;

        Ok(created)
    }
}
