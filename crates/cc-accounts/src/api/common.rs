//! Common API types
//!
//! The JSON envelope shared by every endpoint and the error-to-response
//! mapping. Server-side failure detail never reaches the client; it goes to
//! the operator log instead.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::error::AccountsError;

/// Standard success envelope.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            data,
            message: message.into(),
            success: true,
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::CREATED.as_u16(),
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Standard failure envelope.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
    pub errors: Vec<String>,
}

pub type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, AccountsError>;

impl AccountsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountsError::Validation { .. } => StatusCode::BAD_REQUEST,
            AccountsError::Duplicate { .. } => StatusCode::CONFLICT,
            AccountsError::NotFound { .. } => StatusCode::NOT_FOUND,
            AccountsError::Unauthorized { .. }
            | AccountsError::InvalidToken { .. }
            | AccountsError::TokenExpired => StatusCode::UNAUTHORIZED,
            AccountsError::Database(_)
            | AccountsError::Serialization(_)
            | AccountsError::Deserialization(_)
            | AccountsError::Json(_)
            | AccountsError::Io(_)
            | AccountsError::Http(_)
            | AccountsError::Configuration { .. }
            | AccountsError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ApiFailure {
            status_code: status.as_u16(),
            message,
            success: false,
            errors: Vec::new(),
        };

        (status, Json(body)).into_response()
    }
}
