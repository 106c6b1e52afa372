//! User Account Endpoints
//!
//! Secured account-maintenance routes:
//! - POST /change-password
//! - GET /me
//! - PATCH /details - Update fullname and/or email
//! - PATCH /avatar - Replace the avatar image (multipart)
//! - PATCH /cover-image - Replace the cover image (multipart)

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::{get, patch, post},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::common::{ApiResponse, ApiResult};
use crate::api::middleware::Authenticated;
use crate::api::uploads::stage_uploads;
use crate::domain::UserProfile;
use crate::error::AccountsError;
use crate::repository::CredentialStore;
use crate::service::media::MediaUploader;
use crate::service::session::SessionService;

/// Change password request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Update account details request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
}

/// Users service state
#[derive(Clone)]
pub struct UsersState {
    pub store: Arc<dyn CredentialStore>,
    pub media: Arc<dyn MediaUploader>,
    pub session: Arc<SessionService>,
    pub staging_dir: PathBuf,
}

/// Change the current user's password
#[utoipa::path(
    post,
    path = "/change-password",
    tag = "users",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Old password incorrect or not authenticated")
    )
)]
pub async fn change_password(
    State(state): State<UsersState>,
    Authenticated(user): Authenticated,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<serde_json::Value> {
    state
        .session
        .change_password(&user.id, &req.old_password, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::ok(
        serde_json::json!({}),
        "password changed successfully",
    )))
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user profile", body = UserProfile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<UsersState>,
    Authenticated(user): Authenticated,
) -> ApiResult<UserProfile> {
    let account = state
        .store
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AccountsError::not_found("UserAccount", &user.id))?;

    Ok(Json(ApiResponse::ok(account.profile(), "current user")))
}

/// Update fullname and/or email
#[utoipa::path(
    patch,
    path = "/details",
    tag = "users",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "No fields supplied"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_account(
    State(state): State<UsersState>,
    Authenticated(user): Authenticated,
    Json(req): Json<UpdateAccountRequest>,
) -> ApiResult<UserProfile> {
    let fullname = req.fullname.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let email = req.email.as_deref().map(str::trim).filter(|s| !s.is_empty());

    if fullname.is_none() && email.is_none() {
        return Err(AccountsError::validation("fullname or email is required"));
    }

    if let Some(email) = email {
        if let Some(existing) = state.store.find_by_username_or_email(None, Some(email)).await? {
            if existing.id != user.id {
                return Err(AccountsError::duplicate("UserAccount", "email", email));
            }
        }
    }

    let account = state.store.update_profile(&user.id, fullname, email).await?;
    Ok(Json(ApiResponse::ok(
        account.profile(),
        "account details updated",
    )))
}

/// Replace the avatar image
#[utoipa::path(
    patch,
    path = "/avatar",
    tag = "users",
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Missing file or upload failed")
    )
)]
pub async fn update_avatar(
    State(state): State<UsersState>,
    Authenticated(user): Authenticated,
    multipart: Multipart,
) -> ApiResult<UserProfile> {
    let url = upload_image(&state, multipart, "avatar").await?;
    let account = state.store.set_avatar_url(&user.id, &url).await?;
    Ok(Json(ApiResponse::ok(account.profile(), "avatar updated")))
}

/// Replace the cover image
#[utoipa::path(
    patch,
    path = "/cover-image",
    tag = "users",
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Missing file or upload failed")
    )
)]
pub async fn update_cover_image(
    State(state): State<UsersState>,
    Authenticated(user): Authenticated,
    multipart: Multipart,
) -> ApiResult<UserProfile> {
    let url = upload_image(&state, multipart, "coverImage").await?;
    let account = state.store.set_cover_image_url(&user.id, &url).await?;
    Ok(Json(ApiResponse::ok(account.profile(), "cover image updated")))
}

/// Stage the named multipart file field and push it to the media host.
async fn upload_image(
    state: &UsersState,
    multipart: Multipart,
    field: &str,
) -> Result<String, AccountsError> {
    let mut staged = stage_uploads(multipart, &state.staging_dir).await?;
    let file = staged
        .take_file(field)
        .ok_or_else(|| AccountsError::validation(format!("{} file is required", field)))?;

    let asset = state
        .media
        .upload(&file.path)
        .await?
        .ok_or_else(|| AccountsError::validation(format!("{} upload failed", field)))?;

    Ok(asset.url)
}

/// Create the users router
pub fn users_router(state: UsersState) -> Router {
    Router::new()
        .route("/change-password", post(change_password))
        .route("/me", get(me))
        .route("/details", patch(update_account))
        .route("/avatar", patch(update_avatar))
        .route("/cover-image", patch(update_cover_image))
        .with_state(state)
}
