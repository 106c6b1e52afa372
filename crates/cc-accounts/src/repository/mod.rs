//! Repository Layer
//!
//! MongoDB-backed credential storage. Services consume the narrow
//! [`CredentialStore`] contract so the session and registration flows never
//! see the driver directly.

pub mod user;
pub mod indexes;

pub use user::UserRepository;
pub use indexes::ensure_indexes;

use async_trait::async_trait;

use crate::domain::{NewUser, UserAccount};
use crate::error::Result;

/// Auth-relevant storage contract for user accounts.
///
/// `set_refresh_token` is the single mutation path for the stored refresh
/// token. Every write here is a targeted field update; none of them re-hash
/// the password or touch unrelated fields as a side effect.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Match on username OR email; either may be absent.
    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserAccount>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>>;

    /// Persist a new account. The plaintext password is hashed as part of
    /// this write path and never stored.
    async fn create(&self, new_user: NewUser) -> Result<UserAccount>;

    /// One-way salted comparison against the stored hash.
    async fn verify_password(&self, account: &UserAccount, plaintext: &str) -> Result<bool>;

    /// Set (`Some`) or clear (`None`) the stored refresh token.
    async fn set_refresh_token(&self, id: &str, token: Option<&str>) -> Result<()>;

    /// Replace the password, hashing the new plaintext before the write.
    async fn update_password(&self, id: &str, new_password: &str) -> Result<()>;

    /// Update fullname and/or email, returning the fresh record.
    async fn update_profile(
        &self,
        id: &str,
        fullname: Option<&str>,
        email: Option<&str>,
    ) -> Result<UserAccount>;

    async fn set_avatar_url(&self, id: &str, url: &str) -> Result<UserAccount>;

    async fn set_cover_image_url(&self, id: &str, url: &str) -> Result<UserAccount>;
}
