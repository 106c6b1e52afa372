//! Registration Flow
//!
//! Input validation, uniqueness check, media upload, credential creation.
//! The media uploader is an injected collaborator, never a global.

use std::sync::Arc;

use tracing::info;

use crate::domain::{NewUser, UserProfile};
use crate::error::{AccountsError, Result};
use crate::repository::CredentialStore;
use crate::service::media::{MediaUploader, StagedFile};

/// Text fields of a registration request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub fullname: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn CredentialStore>,
    media: Arc<dyn MediaUploader>,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn CredentialStore>, media: Arc<dyn MediaUploader>) -> Self {
        Self { store, media }
    }

    pub async fn register(
        &self,
        registration: Registration,
        avatar: Option<StagedFile>,
        cover_image: Option<StagedFile>,
    ) -> Result<UserProfile> {
        let Registration {
            fullname,
            email,
            username,
            password,
        } = registration;

        if [&fullname, &email, &username, &password]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(AccountsError::validation("all fields are required"));
        }

        if self
            .store
            .find_by_username_or_email(Some(&username), Some(&email))
            .await?
            .is_some()
        {
            return Err(AccountsError::duplicate("UserAccount", "username or email", &username));
        }

        let avatar =
            avatar.ok_or_else(|| AccountsError::validation("avatar file is required"))?;
        let avatar_asset = self
            .media
            .upload(&avatar.path)
            .await?
            .ok_or_else(|| AccountsError::validation("avatar upload failed"))?;

        // The cover image is optional both ways: absent from the request, or
        // rejected by the host.
        let cover_image_url = match cover_image {
            Some(file) => self.media.upload(&file.path).await?.map(|asset| asset.url),
            None => None,
        };

        let account = self
            .store
            .create(NewUser {
                username,
                email,
                fullname,
                password,
                avatar_url: avatar_asset.url,
                cover_image_url,
            })
            .await?;

        info!(user_id = %account.id, username = %account.username, "user registered");
        Ok(account.profile())
    }
}
