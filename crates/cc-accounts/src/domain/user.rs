//! User Account Entity
//!
//! The credential record owned by the credential store, plus the sanitized
//! projection returned by API responses.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use utoipa::ToSchema;

/// A registered user account.
///
/// `password_hash` and `refresh_token` are secrets: they are persisted but
/// never serialized into an API response. Use [`UserAccount::profile`] for
/// anything client-facing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(rename = "_id")]
    pub id: String,

    /// Unique handle, stored lowercase.
    pub username: String,

    /// Unique email address.
    pub email: String,

    /// Display name.
    pub fullname: String,

    /// Media-host URL of the avatar image.
    pub avatar_url: String,

    /// Media-host URL of the cover image, if one was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,

    /// Argon2id hash of the password. Never compared in plaintext.
    pub password_hash: String,

    /// The single currently-valid refresh token, if a session is active.
    /// Rotation overwrites it; logout clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied at registration, after upload of the images.
/// `password` is plaintext here; the credential store hashes it as part of
/// the create path and it is never persisted or logged.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}

impl UserAccount {
    /// Build a fresh account record from registration fields and the already
    /// computed password hash. Normalizes the username to lowercase.
    pub fn new(new_user: &NewUser, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: new_user.username.trim().to_lowercase(),
            email: new_user.email.trim().to_string(),
            fullname: new_user.fullname.trim().to_string(),
            avatar_url: new_user.avatar_url.clone(),
            cover_image_url: new_user.cover_image_url.clone(),
            password_hash: password_hash.into(),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sanitized projection: everything a client may see, secrets excluded.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            fullname: self.fullname.clone(),
            avatar_url: self.avatar_url.clone(),
            cover_image_url: self.cover_image_url.clone(),
            created_at: self.created_at,
        }
    }
}

/// Account representation with secret fields excluded.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub avatar_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
