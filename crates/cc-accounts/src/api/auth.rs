//! Auth API Endpoints
//!
//! Session lifecycle endpoints:
//! - POST /register - Create an account (multipart: fields + avatar/cover)
//! - POST /login - Password-based login
//! - POST /logout - Clear the active session
//! - POST /refresh-token - Rotate the refresh token
//!
//! Login and refresh set both tokens as httpOnly+secure cookies and also
//! return them in the body, so cookie and bearer clients both work.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::common::ApiResponse;
use crate::api::middleware::{ACCESS_TOKEN_COOKIE, Authenticated, REFRESH_TOKEN_COOKIE};
use crate::api::uploads::stage_uploads;
use crate::domain::UserProfile;
use crate::error::AccountsError;
use crate::service::registration::{Registration, RegistrationService};
use crate::service::session::{LoginCredentials, SessionService, TokenPair};

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username (either this or email is required)
    pub username: Option<String>,

    /// Email address
    pub email: Option<String>,

    /// Password
    pub password: String,
}

/// Login response data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh request; the token may also come from the cookie.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Refresh response data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: String,
}

/// Auth service state
#[derive(Clone)]
pub struct AuthApiState {
    pub session: Arc<SessionService>,
    pub registration: Arc<RegistrationService>,
    pub staging_dir: PathBuf,
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .path("/")
        .build()
}

fn set_session_cookies(jar: CookieJar, pair: &TokenPair) -> CookieJar {
    jar.add(session_cookie(ACCESS_TOKEN_COOKIE, pair.access_token.clone()))
        .add(session_cookie(REFRESH_TOKEN_COOKIE, pair.refresh_token.clone()))
}

fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(session_cookie(ACCESS_TOKEN_COOKIE, String::new()))
        .remove(session_cookie(REFRESH_TOKEN_COOKIE, String::new()))
}

/// Register a new account
///
/// Multipart form: `fullname`, `email`, `username`, `password` text fields,
/// a required `avatar` file and an optional `coverImage` file.
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Missing field or avatar"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn register(
    State(state): State<AuthApiState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), AccountsError> {
    let mut staged = stage_uploads(multipart, &state.staging_dir).await?;

    let registration = Registration {
        fullname: staged.text("fullname").unwrap_or_default().to_string(),
        email: staged.text("email").unwrap_or_default().to_string(),
        username: staged.text("username").unwrap_or_default().to_string(),
        password: staged.text("password").unwrap_or_default().to_string(),
    };
    let avatar = staged.take_file("avatar");
    let cover_image = staged.take_file("coverImage");

    let profile = state
        .registration
        .register(registration, avatar, cover_image)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(profile, "user registered successfully")),
    ))
}

/// Login with username or email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionData),
        (status = 400, description = "Neither username nor email supplied"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "No matching account")
    )
)]
pub async fn login(
    State(state): State<AuthApiState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionData>>), AccountsError> {
    let (user, pair) = state
        .session
        .login(LoginCredentials {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    let jar = set_session_cookies(jar, &pair);

    let data = SessionData {
        user,
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    };
    Ok((jar, Json(ApiResponse::ok(data, "user logged in successfully"))))
}

/// Logout the current session
///
/// Clears the stored refresh token and both cookies. Idempotent.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AuthApiState>,
    Authenticated(user): Authenticated,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<serde_json::Value>>), AccountsError> {
    state.session.logout(&user.id).await?;

    let jar = clear_session_cookies(jar);
    Ok((
        jar,
        Json(ApiResponse::ok(serde_json::json!({}), "user logged out")),
    ))
}

/// Exchange a refresh token for a fresh pair
///
/// The token is read from the `refresh_token` cookie or the request body.
/// Success rotates the stored token; the previous one is permanently
/// invalid afterwards.
#[utoipa::path(
    post,
    path = "/refresh-token",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed", body = TokenData),
        (status = 401, description = "Missing, invalid, or already-used refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AuthApiState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> Result<(CookieJar, Json<ApiResponse<TokenData>>), AccountsError> {
    let presented = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| body.and_then(|Json(b)| b.refresh_token));

    let pair = state.session.refresh(presented.as_deref()).await?;

    let jar = set_session_cookies(jar, &pair);

    let data = TokenData {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    };
    Ok((jar, Json(ApiResponse::ok(data, "access token refreshed"))))
}

/// Create the auth router
pub fn auth_router(state: AuthApiState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-token", post(refresh_token))
        .with_state(state)
}
