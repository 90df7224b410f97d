//! Account login

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::user::{LoginRequest, LoginResponse},
    AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginPageQuery {
    /// Page the caller was redirected from
    pub next: Option<String>,
}

/// Login page context
#[derive(Serialize, ToSchema)]
pub struct LoginPage {
    pub next: Option<String>,
    /// Where credentials are posted
    pub login_url: String,
}

/// Login page target of guard redirects
#[utoipa::path(
    get,
    path = "/accounts/login/",
    tag = "auth",
    params(LoginPageQuery),
    responses(
        (status = 200, description = "Login page context", body = LoginPage)
    )
)]
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginPageQuery>,
) -> Json<LoginPage> {
    Json(LoginPage {
        next: query.next,
        login_url: state.config.auth.login_url.clone(),
    })
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/accounts/login/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .services
        .users
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(response))
}
