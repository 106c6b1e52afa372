//! OpenAPI Documentation

use utoipa::OpenApi;

use crate::api::{auth, users};
use crate::domain::UserProfile;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ClipCast Accounts API",
        description = "Registration, login, session refresh, and account maintenance",
        version = "0.1.0"
    ),
    paths(
        auth::register,
        auth::login,
        auth::logout,
        auth::refresh_token,
        users::change_password,
        users::me,
        users::update_account,
        users::update_avatar,
        users::update_cover_image,
    ),
    components(schemas(
        UserProfile,
        auth::LoginRequest,
        auth::SessionData,
        auth::RefreshRequest,
        auth::TokenData,
        users::ChangePasswordRequest,
        users::UpdateAccountRequest,
    )),
    tags(
        (name = "auth", description = "Session lifecycle"),
        (name = "users", description = "Account maintenance")
    )
)]
pub struct AccountsApiDoc;
