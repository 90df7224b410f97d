//! Catalog administration endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{Book, CreateBook},
        book_instance::{BookInstance, CreateBookInstance, UpdateBookInstance},
        genre::{CreateGenre, Genre},
        language::{CreateLanguage, LanguageView, VocabularyEntry},
    },
    AppState,
};

use super::CatalogManager;

/// Create a genre
#[utoipa::path(
    post,
    path = "/catalog/genres/",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Catalog management permission required")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    _manager: CatalogManager,
    Json(genre): Json<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let created = state.services.catalog.create_genre(&genre).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Create a language from the vocabulary
#[utoipa::path(
    post,
    path = "/catalog/languages/",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateLanguage,
    responses(
        (status = 201, description = "Language created", body = LanguageView),
        (status = 400, description = "Code not in the vocabulary"),
        (status = 403, description = "Catalog management permission required"),
        (status = 409, description = "Language already exists")
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    _manager: CatalogManager,
    Json(language): Json<CreateLanguage>,
) -> AppResult<(StatusCode, Json<LanguageView>)> {
    let created = state.services.catalog.create_language(&language).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Known language codes, in vocabulary order
#[utoipa::path(
    get,
    path = "/catalog/languages/vocabulary",
    tag = "admin",
    responses(
        (status = 200, description = "Language vocabulary", body = Vec<VocabularyEntry>)
    )
)]
pub async fn language_vocabulary(State(state): State<AppState>) -> Json<Vec<VocabularyEntry>> {
    Json(state.services.catalog.vocabulary())
}

/// Create a book with its genres
#[utoipa::path(
    post,
    path = "/catalog/books/",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or unknown author, language or genre"),
        (status = 403, description = "Catalog management permission required")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    _manager: CatalogManager,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.catalog.create_book(&book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Create a copy of a book
#[utoipa::path(
    post,
    path = "/catalog/bookinstances/",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateBookInstance,
    responses(
        (status = 201, description = "Book instance created", body = BookInstance),
        (status = 400, description = "Invalid input or unknown book or borrower"),
        (status = 403, description = "Catalog management permission required")
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    _manager: CatalogManager,
    Json(instance): Json<CreateBookInstance>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    let created = state.services.catalog.create_book_instance(&instance).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update status, due date and borrower of a copy
#[utoipa::path(
    put,
    path = "/catalog/bookinstances/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    request_body = UpdateBookInstance,
    responses(
        (status = 200, description = "Book instance updated", body = BookInstance),
        (status = 403, description = "Catalog management permission required"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    _manager: CatalogManager,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateBookInstance>,
) -> AppResult<Json<BookInstance>> {
    let updated = state.services.catalog.update_book_instance(id, &update).await?;
    Ok(Json(updated))
}
