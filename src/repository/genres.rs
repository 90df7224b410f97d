//! Genres repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::genre::{CreateGenre, Genre},
};

use super::{constraint_error, contains_pattern};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenresStore: Send + Sync {
    async fn count(&self) -> AppResult<i64>;

    /// Genres whose name contains `needle`, case-insensitive
    async fn count_name_contains(&self, needle: &str) -> AppResult<i64>;

    /// Genres of a book ordered by id
    async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<Genre>>;

    async fn create(&self, genre: &CreateGenre) -> AppResult<Genre>;
}

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenresStore for GenresRepository {
    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_name_contains(&self, needle: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres WHERE name ILIKE $1")
            .bind(contains_pattern(needle))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    async fn create(&self, genre: &CreateGenre) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("INSERT INTO genres (name) VALUES ($1) RETURNING id, name")
            .bind(genre.name.trim())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| constraint_error(e, "Genre"))
    }
}
