//! Public catalog pages: home summary, listings and detail views

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetail},
        book::{BookDetail, BookSummary},
        page::{PageInfo, PageQuery},
    },
    services::catalog::CatalogCounts,
    AppState,
};

use super::session::session_id;

/// Static extra context of the listing pages
pub const SOME_DATA: &str = "This is just some data";

#[derive(Serialize, ToSchema)]
pub struct HomeResponse {
    #[serde(flatten)]
    pub counts: CatalogCounts,
    /// Visits in this session before the current one
    pub num_visits: u64,
}

#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    pub book_list: Vec<BookSummary>,
    pub page: PageInfo,
    pub some_data: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthorListResponse {
    pub author_list: Vec<Author>,
    pub page: PageInfo,
    pub some_data: String,
}

/// Home page summary
#[utoipa::path(
    get,
    path = "/",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog counts and session visits", body = HomeResponse)
    )
)]
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<HomeResponse>)> {
    let counts = state.services.catalog.counts().await?;
    let (jar, session) = session_id(jar, &state.config.session);
    let num_visits = state.services.sessions.record_visit(&session).await?;

    Ok((jar, Json(HomeResponse { counts, num_visits })))
}

/// Books with "were" in the title
#[utoipa::path(
    get,
    path = "/books/",
    tag = "catalog",
    params(PageQuery),
    responses(
        (status = 200, description = "Book listing", body = BookListResponse),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<BookListResponse>> {
    let (book_list, page) = state.services.catalog.list_books(query.page).await?;
    Ok(Json(BookListResponse {
        book_list,
        page,
        some_data: SOME_DATA.to_string(),
    }))
}

/// Get book details
#[utoipa::path(
    get,
    path = "/book/{id}",
    tag = "catalog",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Authors in default order
#[utoipa::path(
    get,
    path = "/authors/",
    tag = "catalog",
    params(PageQuery),
    responses(
        (status = 200, description = "Author listing", body = AuthorListResponse),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<AuthorListResponse>> {
    let (author_list, page) = state.services.catalog.list_authors(query.page).await?;
    Ok(Json(AuthorListResponse {
        author_list,
        page,
        some_data: SOME_DATA.to_string(),
    }))
}

/// Get author details with their books
#[utoipa::path(
    get,
    path = "/author/{id}",
    tag = "catalog",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.catalog.get_author_detail(id).await?;
    Ok(Json(author))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header::COOKIE, header::SET_COOKIE, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::{
        api::{router, testing},
        error::AppError,
        repository::testing::MockStores,
    };

    fn empty_catalog() -> MockStores {
        let mut stores = MockStores::new();
        stores.books.expect_count().returning(|| Ok(0));
        stores.books.expect_count_title_contains().returning(|_| Ok(0));
        stores
            .books
            .expect_find_by_title_contains()
            .returning(|_, _| Ok(vec![]));
        stores.book_instances.expect_count().returning(|| Ok(0));
        stores.book_instances.expect_count_by_status().returning(|_| Ok(0));
        stores.authors.expect_count().returning(|| Ok(0));
        stores.genres.expect_count_name_contains().returning(|_| Ok(0));
        stores
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_home_counts_visits_per_session() {
        let app = router(testing::state(empty_catalog()));

        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let session = set_cookie.split(';').next().unwrap().to_string();

        let body = body_json(response).await;
        assert_eq!(body["num_visits"], 0);
        assert_eq!(body["num_books"], 0);

        let response = app
            .oneshot(
                Request::get("/")
                    .header(COOKIE, session)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(body_json(response).await["num_visits"], 1);
    }

    #[tokio::test]
    async fn test_book_listing_carries_static_data() {
        let app = router(testing::state(empty_catalog()));

        let response = app
            .oneshot(Request::get("/books/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["some_data"], "This is just some data");
        assert_eq!(body["book_list"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_missing_author_is_404() {
        let mut stores = MockStores::new();
        stores
            .authors
            .expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(format!("Author with id {} not found", id))));

        let app = router(testing::state(stores));
        let response = app
            .oneshot(Request::get("/author/99").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
