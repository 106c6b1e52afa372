//! API Middleware
//!
//! Request authentication for Axum. Identity comes from the access token —
//! bearer header or cookie — verified statelessly; the claims are trusted
//! without a storage lookup.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::AccountsError;
use crate::service::token::{TokenService, extract_bearer_token};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Shared state for request authentication, added as an Extension layer.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
}

/// Identity proven by a verified access token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub fullname: String,
}

/// Extractor for authenticated requests.
pub struct Authenticated(pub CurrentUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let app_state = parts
            .extensions
            .get::<AppState>()
            .ok_or_else(|| AccountsError::internal("AppState not found").into_response())?;

        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token)
            .map(str::to_string);

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(ACCESS_TOKEN_COOKIE)
                .map(|c| c.value().to_string())
                .ok_or_else(|| {
                    AccountsError::unauthorized("missing access token").into_response()
                })?,
        };

        let claims = app_state
            .tokens
            .verify_access_token(&token)
            .map_err(|e| e.into_response())?;

        Ok(Authenticated(CurrentUser {
            id: claims.sub,
            username: claims.username,
            email: claims.email,
            fullname: claims.fullname,
        }))
    }
}
