//! Loan listings and the renewal form

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    forms::{FieldErrors, RenewBookForm},
    models::{
        book_instance::{BookInstance, BookInstanceSummary},
        page::{PageInfo, PageQuery},
    },
    services::loans::RenewalOutcome,
    AppState,
};

use super::{found, AuthenticatedUser, Authorized, Librarian};

/// Where a successful renewal sends the librarian
pub const BORROWED_URL: &str = "/borrowed/";

#[derive(Serialize, ToSchema)]
pub struct LoanListResponse {
    pub bookinstance_list: Vec<BookInstanceSummary>,
    pub page: PageInfo,
}

/// Renewal form context
#[derive(Serialize, ToSchema)]
pub struct RenewResponse {
    pub book_instance: BookInstance,
    pub form: RenewBookForm,
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Copies on loan to the current user; librarians see every loan
#[utoipa::path(
    get,
    path = "/mybooks/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "On-loan copies by due date", body = LoanListResponse),
        (status = 302, description = "Not logged in, redirect to login")
    )
)]
pub async fn my_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<LoanListResponse>> {
    let (bookinstance_list, page) = state.services.loans.on_loan_to(&claims, query.page, today()).await?;
    Ok(Json(LoanListResponse {
        bookinstance_list,
        page,
    }))
}

/// Every copy on loan
#[utoipa::path(
    get,
    path = "/borrowed/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "On-loan copies by due date", body = LoanListResponse),
        (status = 302, description = "Not logged in, redirect to login"),
        (status = 403, description = "Librarian permission required")
    )
)]
pub async fn all_borrowed(
    State(state): State<AppState>,
    _librarian: Librarian,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<LoanListResponse>> {
    let (bookinstance_list, page) = state.services.loans.all_borrowed(query.page, today()).await?;
    Ok(Json(LoanListResponse {
        bookinstance_list,
        page,
    }))
}

/// Renewal form with the proposed date
#[utoipa::path(
    get,
    path = "/book/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Renewal form", body = RenewResponse),
        (status = 302, description = "Not logged in, redirect to login"),
        (status = 403, description = "Librarian permission required"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renew_form(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewResponse>> {
    let (book_instance, form) = state.services.loans.renewal_form(id, today()).await?;
    Ok(Json(RenewResponse {
        book_instance,
        form,
        errors: FieldErrors::new(),
    }))
}

/// Renew a book instance
#[utoipa::path(
    post,
    path = "/book/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    request_body(content = RenewBookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Renewed, redirect to the borrowed list"),
        (status = 200, description = "Form with errors", body = RenewResponse),
        (status = 403, description = "Librarian permission required"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renew(
    State(state): State<AppState>,
    Authorized(claims, _): Librarian,
    Path(id): Path<Uuid>,
    Form(form): Form<RenewBookForm>,
) -> AppResult<Response> {
    match state.services.loans.renew(id, form, today()).await? {
        RenewalOutcome::Renewed(_) => {
            tracing::debug!("{} renewed book instance {}", claims.sub, id);
            Ok(found(BORROWED_URL))
        }
        RenewalOutcome::Invalid {
            instance,
            form,
            errors,
        } => Ok(Json(RenewResponse {
            book_instance: instance,
            form,
            errors,
        })
        .into_response()),
    }
}
