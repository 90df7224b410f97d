//! HTTP handlers for the catalog site

pub mod admin;
pub mod auth;
pub mod authors;
pub mod catalog;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod session;

use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, LOCATION},
        request::Parts,
        StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::user::{Permission, UserClaims},
    AppState,
};

/// Extractor for the authenticated user from the bearer token.
///
/// Callers without a valid token are redirected to the login page with the
/// requested path in `next`.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let claims = match token {
            Some(token) => match UserClaims::from_token(token, &state.config.auth.jwt_secret) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::debug!("Rejected bearer token: {}", e);
                    return Err(login_required(parts, state));
                }
            },
            None => return Err(login_required(parts, state)),
        };

        Ok(AuthenticatedUser(claims))
    }
}

fn login_required(parts: &Parts, state: &AppState) -> AppError {
    let next = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());
    AppError::LoginRequired {
        location: format!(
            "{}?next={}",
            state.config.auth.login_url,
            urlencoding::encode(next)
        ),
    }
}

/// Permission checked by [`Authorized`]
pub trait RequiredPermission: Send + Sync + 'static {
    const PERMISSION: Permission;
}

pub struct CanMarkReturned;

impl RequiredPermission for CanMarkReturned {
    const PERMISSION: Permission = Permission::CanMarkReturned;
}

pub struct ManageCatalog;

impl RequiredPermission for ManageCatalog {
    const PERMISSION: Permission = Permission::ManageCatalog;
}

/// Authenticated user holding permission `P`; others get 403
pub struct Authorized<P: RequiredPermission>(pub UserClaims, PhantomData<P>);

#[async_trait]
impl<P: RequiredPermission> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        claims.require_permission(P::PERMISSION)?;
        Ok(Authorized(claims, PhantomData))
    }
}

pub type Librarian = Authorized<CanMarkReturned>;
pub type CatalogManager = Authorized<ManageCatalog>;

/// 302 Found to `location`
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let site = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Public catalog
        .route("/", get(catalog::index))
        .route("/books/", get(catalog::list_books))
        .route("/book/:id", get(catalog::get_book))
        .route("/authors/", get(catalog::list_authors))
        .route("/author/:id", get(catalog::get_author))
        // Author forms
        .route("/author/create/", get(authors::create_form).post(authors::create))
        .route("/author/:id/update/", get(authors::update_form).post(authors::update))
        .route("/author/:id/delete/", get(authors::delete_confirm).post(authors::delete))
        // Loans
        .route("/mybooks/", get(loans::my_books))
        .route("/borrowed/", get(loans::all_borrowed))
        .route("/book/:id/renew/", get(loans::renew_form).post(loans::renew))
        // Catalog administration
        .route("/catalog/genres/", post(admin::create_genre))
        .route("/catalog/languages/", post(admin::create_language))
        .route("/catalog/languages/vocabulary", get(admin::language_vocabulary))
        .route("/catalog/books/", post(admin::create_book))
        .route("/catalog/bookinstances/", post(admin::create_book_instance))
        .route("/catalog/bookinstances/:id", put(admin::update_book_instance))
        // Accounts
        .route("/accounts/login/", get(auth::login_page).post(auth::login))
        .with_state(state);

    Router::new()
        .merge(site)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use chrono::Utc;

    use crate::{
        config::AppConfig,
        models::{
            language::LanguageVocabulary,
            user::{Permission, UserClaims},
        },
        repository::testing::MockStores,
        services::{session::MemorySessionStore, Services},
        AppState,
    };

    pub const TEST_SECRET: &str = "router-test-secret";

    pub fn state(stores: MockStores) -> AppState {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = TEST_SECRET.to_string();

        let vocabulary = LanguageVocabulary::parse("en|English\nfr|French\n", "en").unwrap();
        let services = Services::new(
            stores.into_repository(),
            Arc::new(vocabulary),
            Arc::new(MemorySessionStore::new()),
            config.auth.clone(),
        );

        AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }

    /// `Authorization` header value for a user with `permissions`
    pub fn bearer(user_id: i32, permissions: Vec<Permission>) -> String {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: format!("user{}", user_id),
            user_id,
            permissions,
            exp: now + 3600,
            iat: now,
        };
        format!("Bearer {}", claims.create_token(TEST_SECRET).unwrap())
    }
}
