//! Author create, update and delete forms

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    forms::{field_errors, AuthorForm, FieldErrors},
    models::author::Author,
    AppState,
};

use super::found;

/// Redirect target after a deletion
pub const AUTHOR_LIST_URL: &str = "/authors/";

/// Form context: the author being edited (if any), field values and errors
#[derive(Serialize, ToSchema)]
pub struct AuthorFormResponse {
    pub author: Option<Author>,
    pub form: AuthorForm,
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
}

/// Deletion confirmation context
#[derive(Serialize, ToSchema)]
pub struct AuthorDeleteResponse {
    pub author: Author,
}

/// Blank author form
#[utoipa::path(
    get,
    path = "/author/create/",
    tag = "authors",
    responses(
        (status = 200, description = "Empty form with initial values", body = AuthorFormResponse)
    )
)]
pub async fn create_form() -> Json<AuthorFormResponse> {
    Json(AuthorFormResponse {
        author: None,
        form: AuthorForm::initial(),
        errors: FieldErrors::new(),
    })
}

/// Create an author
#[utoipa::path(
    post,
    path = "/author/create/",
    tag = "authors",
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Created, redirect to the author page"),
        (status = 200, description = "Form with errors", body = AuthorFormResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let fields = match form.clean() {
        Ok(fields) => fields,
        Err(errors) => return Ok(invalid(None, form, field_errors(&errors))),
    };

    let author = state.services.catalog.create_author(&fields).await?;
    Ok(found(&author.absolute_url()))
}

/// Author form filled with the stored values
#[utoipa::path(
    get,
    path = "/author/{id}/update/",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Pre-filled form", body = AuthorFormResponse),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorFormResponse>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(AuthorFormResponse {
        form: AuthorForm::from(&author),
        author: Some(author),
        errors: FieldErrors::new(),
    }))
}

/// Update an author
#[utoipa::path(
    post,
    path = "/author/{id}/update/",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Saved, redirect to the author page"),
        (status = 200, description = "Form with errors", body = AuthorFormResponse),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let author = state.services.catalog.get_author(id).await?;

    let fields = match form.clean() {
        Ok(fields) => fields,
        Err(errors) => return Ok(invalid(Some(author), form, field_errors(&errors))),
    };

    let author = state.services.catalog.update_author(id, &fields).await?;
    Ok(found(&author.absolute_url()))
}

/// Deletion confirmation
#[utoipa::path(
    get,
    path = "/author/{id}/delete/",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author to delete", body = AuthorDeleteResponse),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_confirm(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDeleteResponse>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(AuthorDeleteResponse { author }))
}

/// Delete an author
#[utoipa::path(
    post,
    path = "/author/{id}/delete/",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 302, description = "Deleted, redirect to the author list"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    state.services.catalog.delete_author(id).await?;
    Ok(found(AUTHOR_LIST_URL))
}

fn invalid(author: Option<Author>, form: AuthorForm, errors: FieldErrors) -> Response {
    Json(AuthorFormResponse { author, form, errors }).into_response()
}
