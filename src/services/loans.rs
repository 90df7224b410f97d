//! Loan listings and renewal of borrowed copies

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    forms::{field_errors, FieldErrors, RenewBookForm},
    models::{
        book_instance::{BookInstance, BookInstanceSummary},
        page::{PageInfo, PageRequest, PAGE_SIZE},
        user::{Permission, UserClaims},
    },
    repository::Repository,
};

/// Result of a renewal submission
#[derive(Debug)]
pub enum RenewalOutcome {
    /// Due date stored; the caller goes back to the borrowed list
    Renewed(BookInstance),
    /// Form rejected; nothing was written
    Invalid {
        instance: BookInstance,
        form: RenewBookForm,
        errors: FieldErrors,
    },
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copies on loan to the caller; librarians see every loan
    pub async fn on_loan_to(
        &self,
        claims: &UserClaims,
        page: Option<i64>,
        today: NaiveDate,
    ) -> AppResult<(Vec<BookInstanceSummary>, PageInfo)> {
        let borrower_id = if claims.has_permission(Permission::CanMarkReturned) {
            None
        } else {
            Some(claims.user_id)
        };
        self.on_loan(borrower_id, page, today).await
    }

    /// Every copy on loan, across borrowers
    pub async fn all_borrowed(
        &self,
        page: Option<i64>,
        today: NaiveDate,
    ) -> AppResult<(Vec<BookInstanceSummary>, PageInfo)> {
        self.on_loan(None, page, today).await
    }

    async fn on_loan(
        &self,
        borrower_id: Option<i32>,
        page: Option<i64>,
        today: NaiveDate,
    ) -> AppResult<(Vec<BookInstanceSummary>, PageInfo)> {
        let total = self.repository.book_instances.count_on_loan(borrower_id).await?;
        let (window, info) = PageRequest::new(page, PAGE_SIZE).resolve(total)?;
        let loans = self
            .repository
            .book_instances
            .list_on_loan(borrower_id, window)
            .await?
            .into_iter()
            .map(|loan| loan.flag_overdue(today))
            .collect();
        Ok((loans, info))
    }

    /// Copy to renew with the proposed renewal date
    pub async fn renewal_form(&self, id: Uuid, today: NaiveDate) -> AppResult<(BookInstance, RenewBookForm)> {
        let instance = self.repository.book_instances.get_by_id(id).await?;
        Ok((instance, RenewBookForm::proposed(today)))
    }

    /// Validate the submitted date and store it as the new due date
    pub async fn renew(&self, id: Uuid, form: RenewBookForm, today: NaiveDate) -> AppResult<RenewalOutcome> {
        let instance = self.repository.book_instances.get_by_id(id).await?;

        let renewal_date = match form.clean(today) {
            Ok(date) => date,
            Err(errors) => {
                tracing::debug!("Rejected renewal of {} to {}", id, form.renewal_date);
                return Ok(RenewalOutcome::Invalid {
                    instance,
                    errors: field_errors(&errors),
                    form,
                });
            }
        };

        let renewed = self
            .repository
            .book_instances
            .set_due_back(id, renewal_date)
            .await?;
        tracing::info!("Renewed book instance {} until {}", id, renewal_date);

        Ok(RenewalOutcome::Renewed(renewed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        forms::{RENEWAL_IN_PAST, RENEWAL_TOO_FAR},
        models::{book_instance::LoanStatus, page::Window},
        repository::testing::MockStores,
    };
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn instance(id: Uuid) -> BookInstance {
        BookInstance {
            id,
            book_id: Some(1),
            imprint: "Penguin, 2001".to_string(),
            due_back: Some(today() + Duration::days(2)),
            status: LoanStatus::OnLoan,
            borrower_id: Some(7),
        }
    }

    fn renewal(date: NaiveDate) -> RenewBookForm {
        RenewBookForm {
            renewal_date: date.to_string(),
        }
    }

    fn claims(user_id: i32, permissions: Vec<Permission>) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "reader".to_string(),
            user_id,
            permissions,
            exp: now + 3600,
            iat: now,
        }
    }

    #[tokio::test]
    async fn test_borrower_only_sees_own_loans() {
        let mut stores = MockStores::new();
        stores
            .book_instances
            .expect_count_on_loan()
            .with(eq(Some(7)))
            .returning(|_| Ok(0));
        stores
            .book_instances
            .expect_list_on_loan()
            .withf(|borrower, _| *borrower == Some(7))
            .returning(|_, _| Ok(vec![]));

        let loans = LoansService::new(stores.into_repository());
        let (items, info) = loans.on_loan_to(&claims(7, vec![]), None, today()).await.unwrap();

        assert!(items.is_empty());
        assert_eq!(info.num_pages, 1);
    }

    #[tokio::test]
    async fn test_librarian_sees_every_loan() {
        let mut stores = MockStores::new();
        stores
            .book_instances
            .expect_count_on_loan()
            .with(eq(None::<i32>))
            .returning(|_| Ok(12));
        stores
            .book_instances
            .expect_list_on_loan()
            .withf(|borrower, window| borrower.is_none() && *window == Window { offset: 10, limit: 2 })
            .returning(|_, _| Ok(vec![]));

        let loans = LoansService::new(stores.into_repository());
        let librarian = claims(1, vec![Permission::CanMarkReturned]);
        let (_, info) = loans.on_loan_to(&librarian, Some(2), today()).await.unwrap();

        assert_eq!(info.number, 2);
        assert!(info.has_previous);
        assert!(!info.has_next);
    }

    #[tokio::test]
    async fn test_listing_flags_overdue_copies() {
        let mut stores = MockStores::new();
        stores.book_instances.expect_count_on_loan().returning(|_| Ok(2));
        stores.book_instances.expect_list_on_loan().returning(|_, _| {
            Ok([today() - Duration::days(1), today()]
                .into_iter()
                .map(|due| BookInstanceSummary {
                    id: Uuid::new_v4(),
                    book_id: Some(1),
                    book_title: Some("The Left Hand of Darkness".to_string()),
                    imprint: "Ace, 1969".to_string(),
                    due_back: Some(due),
                    status: LoanStatus::OnLoan,
                    borrower_id: Some(7),
                    borrower_username: Some("reader".to_string()),
                    is_overdue: false,
                })
                .collect())
        });

        let loans = LoansService::new(stores.into_repository());
        let (items, _) = loans.all_borrowed(None, today()).await.unwrap();

        let flags: Vec<bool> = items.iter().map(|loan| loan.is_overdue).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[tokio::test]
    async fn test_renewal_form_proposes_three_weeks() {
        let id = Uuid::new_v4();
        let mut stores = MockStores::new();
        stores
            .book_instances
            .expect_get_by_id()
            .with(eq(id))
            .returning(|id| Ok(instance(id)));

        let loans = LoansService::new(stores.into_repository());
        let (_, form) = loans.renewal_form(id, today()).await.unwrap();

        assert_eq!(form.renewal_date, "2024-03-22");
    }

    #[tokio::test]
    async fn test_valid_renewal_stores_exact_date() {
        let id = Uuid::new_v4();
        let date = today() + Duration::weeks(4);
        let mut stores = MockStores::new();
        stores
            .book_instances
            .expect_get_by_id()
            .returning(|id| Ok(instance(id)));
        stores
            .book_instances
            .expect_set_due_back()
            .with(eq(id), eq(date))
            .times(1)
            .returning(|id, date| {
                let mut renewed = instance(id);
                renewed.due_back = Some(date);
                Ok(renewed)
            });

        let loans = LoansService::new(stores.into_repository());
        let outcome = loans
            .renew(id, renewal(date), today())
            .await
            .unwrap();

        match outcome {
            RenewalOutcome::Renewed(renewed) => assert_eq!(renewed.due_back, Some(date)),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_renewal_does_not_write() {
        let id = Uuid::new_v4();
        let mut stores = MockStores::new();
        stores
            .book_instances
            .expect_get_by_id()
            .returning(|id| Ok(instance(id)));
        stores.book_instances.expect_set_due_back().never();

        let loans = LoansService::new(stores.into_repository());

        for (date, message) in [
            (today() - Duration::days(1), RENEWAL_IN_PAST),
            (today() + Duration::weeks(4) + Duration::days(1), RENEWAL_TOO_FAR),
        ] {
            let outcome = loans
                .renew(id, renewal(date), today())
                .await
                .unwrap();
            match outcome {
                RenewalOutcome::Invalid { form, errors, instance } => {
                    assert_eq!(form.renewal_date, date.to_string());
                    assert_eq!(errors["renewal_date"], vec![message.to_string()]);
                    assert_eq!(instance.due_back, Some(today() + Duration::days(2)));
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_renewing_unknown_copy_is_not_found() {
        let mut stores = MockStores::new();
        stores
            .book_instances
            .expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(format!("Book instance {} not found", id))));
        stores.book_instances.expect_set_due_back().never();

        let loans = LoansService::new(stores.into_repository());
        for form in [renewal(today()), RenewBookForm::default()] {
            let result = loans.renew(Uuid::new_v4(), form, today()).await;
            assert!(matches!(result, Err(AppError::NotFound(_))));
        }
    }
}
