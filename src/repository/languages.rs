//! Languages repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::language::Language,
};

use super::constraint_error;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguagesStore: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Language>;

    /// Store a vocabulary code; codes are unique
    async fn create(&self, code: &str) -> AppResult<Language>;
}

#[derive(Clone)]
pub struct LanguagesRepository {
    pool: Pool<Postgres>,
}

impl LanguagesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LanguagesStore for LanguagesRepository {
    async fn get_by_id(&self, id: i32) -> AppResult<Language> {
        sqlx::query_as::<_, Language>("SELECT id, code FROM languages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Language with id {} not found", id)))
    }

    async fn create(&self, code: &str) -> AppResult<Language> {
        sqlx::query_as::<_, Language>("INSERT INTO languages (code) VALUES ($1) RETURNING id, code")
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| constraint_error(e, "Language"))
    }
}
