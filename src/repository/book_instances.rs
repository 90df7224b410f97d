//! Book instances repository for database operations

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{
            BookInstance, BookInstanceSummary, CreateBookInstance, LoanStatus, UpdateBookInstance,
        },
        page::Window,
    },
};

use super::constraint_error;

const INSTANCE_COLUMNS: &str = "id, book_id, imprint, due_back, status, borrower_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstancesStore: Send + Sync {
    async fn count(&self) -> AppResult<i64>;

    async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64>;

    /// Copies of a book ordered by due date
    async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>>;

    /// On-loan copies, all borrowers when `borrower_id` is `None`
    async fn count_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64>;

    /// On-loan copies ordered by due date ascending
    async fn list_on_loan(
        &self,
        borrower_id: Option<i32>,
        window: Window,
    ) -> AppResult<Vec<BookInstanceSummary>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance>;

    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance>;

    async fn create(&self, instance: &CreateBookInstance) -> AppResult<BookInstance>;

    async fn update(&self, id: Uuid, update: &UpdateBookInstance) -> AppResult<BookInstance>;
}

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstancesStore for BookInstancesRepository {
    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let query = format!(
            "SELECT {} FROM book_instances WHERE book_id = $1 ORDER BY due_back, id",
            INSTANCE_COLUMNS
        );
        let instances = sqlx::query_as::<_, BookInstance>(&query)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(instances)
    }

    async fn count_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM book_instances
            WHERE status = $1 AND ($2::int4 IS NULL OR borrower_id = $2)
            "#,
        )
        .bind(LoanStatus::OnLoan)
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn list_on_loan(
        &self,
        borrower_id: Option<i32>,
        window: Window,
    ) -> AppResult<Vec<BookInstanceSummary>> {
        let instances = sqlx::query_as::<_, BookInstanceSummary>(
            r#"
            SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.due_back,
                   bi.status, bi.borrower_id, u.username AS borrower_username
            FROM book_instances bi
            LEFT JOIN books b ON b.id = bi.book_id
            LEFT JOIN users u ON u.id = bi.borrower_id
            WHERE bi.status = $1 AND ($2::int4 IS NULL OR bi.borrower_id = $2)
            ORDER BY bi.due_back, bi.id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(LoanStatus::OnLoan)
        .bind(borrower_id)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(instances)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        let query = format!("SELECT {} FROM book_instances WHERE id = $1", INSTANCE_COLUMNS);
        sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        let query = format!(
            "UPDATE book_instances SET due_back = $1 WHERE id = $2 RETURNING {}",
            INSTANCE_COLUMNS
        );
        sqlx::query_as::<_, BookInstance>(&query)
            .bind(due_back)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    async fn create(&self, instance: &CreateBookInstance) -> AppResult<BookInstance> {
        let query = format!(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, status, borrower_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        );
        sqlx::query_as::<_, BookInstance>(&query)
            .bind(Uuid::new_v4())
            .bind(instance.book_id)
            .bind(instance.imprint.trim())
            .bind(instance.due_back)
            .bind(instance.status)
            .bind(instance.borrower_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| constraint_error(e, "Book instance"))
    }

    async fn update(&self, id: Uuid, update: &UpdateBookInstance) -> AppResult<BookInstance> {
        let query = format!(
            r#"
            UPDATE book_instances
            SET status = $1, due_back = $2, borrower_id = $3
            WHERE id = $4
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        );
        sqlx::query_as::<_, BookInstance>(&query)
            .bind(update.status)
            .bind(update.due_back)
            .bind(update.borrower_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| constraint_error(e, "Book instance"))?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }
}
