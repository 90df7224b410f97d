//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::user::User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersStore: Send + Sync {
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert unless the username is taken; returns whether a row was created
    async fn create_if_missing(
        &self,
        username: &str,
        password_hash: &str,
        permissions: &[String],
    ) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersStore for UsersRepository {
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, permissions FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_if_missing(
        &self,
        username: &str,
        password_hash: &str,
        permissions: &[String],
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, permissions)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(permissions)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
