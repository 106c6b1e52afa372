//! Shared test doubles: an in-memory credential store and a scripted media
//! uploader, wired to the real services.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cc_accounts::domain::{NewUser, UserAccount};
use cc_accounts::error::{AccountsError, Result};
use cc_accounts::repository::CredentialStore;
use cc_accounts::service::{
    MediaAsset, MediaUploader, PasswordService, SessionService, StagedFile, TokenConfig,
    TokenService,
};

/// In-memory `CredentialStore` mirroring the repository semantics.
pub struct MemoryStore {
    passwords: PasswordService,
    accounts: Mutex<HashMap<String, UserAccount>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            passwords: PasswordService::new(),
            accounts: Mutex::new(HashMap::new()),
        }
    }

    fn with_account<T>(&self, id: &str, f: impl FnOnce(&mut UserAccount) -> T) -> Result<T> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| AccountsError::not_found("UserAccount", id))?;
        Ok(f(account))
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserAccount>> {
        let username = username.map(|u| u.trim().to_lowercase());
        let email = email.map(str::trim);
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .find(|a| {
                username.as_deref().is_some_and(|u| a.username == u)
                    || email.is_some_and(|e| a.email == e)
            })
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>> {
        Ok(self.accounts.lock().unwrap().get(id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<UserAccount> {
        let password_hash = self.passwords.hash_password(&new_user.password)?;
        let account = UserAccount::new(&new_user, password_hash);
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn verify_password(&self, account: &UserAccount, plaintext: &str) -> Result<bool> {
        self.passwords.verify_password(plaintext, &account.password_hash)
    }

    async fn set_refresh_token(&self, id: &str, token: Option<&str>) -> Result<()> {
        // Idempotent like the targeted update: unknown ids match nothing.
        if let Some(account) = self.accounts.lock().unwrap().get_mut(id) {
            account.refresh_token = token.map(str::to_string);
        }
        Ok(())
    }

    async fn update_password(&self, id: &str, new_password: &str) -> Result<()> {
        let password_hash = self.passwords.hash_password(new_password)?;
        self.with_account(id, |account| {
            account.password_hash = password_hash;
        })
    }

    async fn update_profile(
        &self,
        id: &str,
        fullname: Option<&str>,
        email: Option<&str>,
    ) -> Result<UserAccount> {
        self.with_account(id, |account| {
            if let Some(fullname) = fullname {
                account.fullname = fullname.trim().to_string();
            }
            if let Some(email) = email {
                account.email = email.trim().to_string();
            }
            account.clone()
        })
    }

    async fn set_avatar_url(&self, id: &str, url: &str) -> Result<UserAccount> {
        self.with_account(id, |account| {
            account.avatar_url = url.to_string();
            account.clone()
        })
    }

    async fn set_cover_image_url(&self, id: &str, url: &str) -> Result<UserAccount> {
        self.with_account(id, |account| {
            account.cover_image_url = Some(url.to_string());
            account.clone()
        })
    }
}

/// Media uploader double honoring the collaborator contract: the staged file
/// is removed whether or not the upload "succeeds". Failures can be scripted
/// for every file or only for files whose name contains a marker.
pub struct StubUploader {
    fail_matching: Option<String>,
    pub removed: Mutex<Vec<PathBuf>>,
}

impl StubUploader {
    pub fn ok() -> Self {
        Self {
            fail_matching: None,
            removed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_matching: Some(String::new()),
            removed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_for(marker: &str) -> Self {
        Self {
            fail_matching: Some(marker.to_string()),
            removed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MediaUploader for StubUploader {
    async fn upload(&self, local_path: &Path) -> Result<Option<MediaAsset>> {
        let _ = tokio::fs::remove_file(local_path).await;
        self.removed.lock().unwrap().push(local_path.to_path_buf());

        let name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(marker) = &self.fail_matching {
            if name.contains(marker.as_str()) {
                return Ok(None);
            }
        }
        Ok(Some(MediaAsset {
            url: format!("https://media.test/{}", name),
        }))
    }
}

pub fn token_config() -> TokenConfig {
    TokenConfig {
        access_secret: "test-access-secret".to_string(),
        refresh_secret: "test-refresh-secret".to_string(),
        access_ttl_secs: 900,
        refresh_ttl_secs: 864_000,
    }
}

pub fn session_fixture() -> (Arc<MemoryStore>, SessionService) {
    let store = Arc::new(MemoryStore::new());
    let tokens = Arc::new(TokenService::new(token_config()).unwrap());
    let session = SessionService::new(store.clone(), tokens);
    (store, session)
}

pub fn alice() -> NewUser {
    NewUser {
        username: "alice".to_string(),
        email: "alice@x.com".to_string(),
        fullname: "Alice Example".to_string(),
        password: "pw123".to_string(),
        avatar_url: "https://media.test/avatar.png".to_string(),
        cover_image_url: None,
    }
}

/// Write a real staged file under `dir` the way the multipart layer does.
pub fn staged_file(dir: &Path, field: &str) -> StagedFile {
    let path = dir.join(format!("{}-{}", field, uuid::Uuid::new_v4()));
    std::fs::write(&path, b"image-bytes").unwrap();
    StagedFile {
        path,
        original_name: Some(format!("{}.png", field)),
    }
}
