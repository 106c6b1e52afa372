//! API Layer
//!
//! REST endpoints for the account backend plus the shared response envelope,
//! request authentication, and multipart staging.

pub mod common;
pub mod middleware;
pub mod uploads;
pub mod auth;
pub mod users;
pub mod openapi;

pub use common::{ApiResponse, ApiFailure, ApiResult};
pub use middleware::{AppState, Authenticated, CurrentUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use auth::{AuthApiState, auth_router};
pub use users::{UsersState, users_router};
pub use openapi::AccountsApiDoc;
