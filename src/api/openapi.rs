//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, authors, catalog, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.3.0",
        description = "Local library catalog: books, authors, copies and loans"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::index,
        catalog::list_books,
        catalog::get_book,
        catalog::list_authors,
        catalog::get_author,
        // Author forms
        authors::create_form,
        authors::create,
        authors::update_form,
        authors::update,
        authors::delete_confirm,
        authors::delete,
        // Loans
        loans::my_books,
        loans::all_borrowed,
        loans::renew_form,
        loans::renew,
        // Administration
        admin::create_genre,
        admin::create_language,
        admin::language_vocabulary,
        admin::create_book,
        admin::create_book_instance,
        admin::update_book_instance,
        // Accounts
        auth::login_page,
        auth::login,
    ),
    components(
        schemas(
            // Catalog
            catalog::HomeResponse,
            catalog::BookListResponse,
            catalog::AuthorListResponse,
            crate::services::catalog::CatalogCounts,
            crate::models::page::PageInfo,
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookDetail,
            crate::models::book::CreateBook,
            crate::models::author::Author,
            crate::models::author::AuthorDetail,
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::language::LanguageView,
            crate::models::language::CreateLanguage,
            crate::models::language::VocabularyEntry,
            crate::models::book_instance::LoanStatus,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceSummary,
            crate::models::book_instance::CreateBookInstance,
            crate::models::book_instance::UpdateBookInstance,
            // Forms
            crate::forms::AuthorForm,
            crate::forms::RenewBookForm,
            authors::AuthorFormResponse,
            authors::AuthorDeleteResponse,
            loans::LoanListResponse,
            loans::RenewResponse,
            // Accounts
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            auth::LoginPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Public catalog pages"),
        (name = "authors", description = "Author forms"),
        (name = "loans", description = "Loans and renewals"),
        (name = "admin", description = "Catalog administration"),
        (name = "auth", description = "Accounts")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
