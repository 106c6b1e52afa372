//! Registration flow tests
//!
//! Field validation, uniqueness, avatar requirement, media-host failure
//! handling, and staged-file cleanup.

mod common;

use std::sync::Arc;

use cc_accounts::error::AccountsError;
use cc_accounts::repository::CredentialStore;
use cc_accounts::service::{Registration, RegistrationService};

use common::{MemoryStore, StubUploader, staged_file};

fn registration() -> Registration {
    Registration {
        fullname: "Alice Example".to_string(),
        email: "alice@x.com".to_string(),
        username: "Alice".to_string(),
        password: "pw123".to_string(),
    }
}

fn service(uploader: StubUploader) -> (Arc<MemoryStore>, Arc<StubUploader>, RegistrationService) {
    let store = Arc::new(MemoryStore::new());
    let media = Arc::new(uploader);
    let service = RegistrationService::new(store.clone(), media.clone());
    (store, media, service)
}

#[tokio::test]
async fn register_creates_account_with_sanitized_response() {
    let (store, _, service) = service(StubUploader::ok());
    let dir = tempfile::tempdir().unwrap();

    let profile = service
        .register(registration(), Some(staged_file(dir.path(), "avatar")), None)
        .await
        .unwrap();

    // Username is normalized, secrets never serialized.
    assert_eq!(profile.username, "alice");
    assert!(profile.avatar_url.starts_with("https://media.test/avatar-"));
    assert!(profile.cover_image_url.is_none());
    let json = serde_json::to_string(&profile).unwrap();
    assert!(!json.contains("passwordHash"));
    assert!(!json.contains("refreshToken"));
    assert!(!json.contains("pw123"));

    // The stored record holds a hash, not the plaintext.
    let stored = store
        .find_by_username_or_email(Some("alice"), None)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "pw123");
    assert!(store.verify_password(&stored, "pw123").await.unwrap());
}

#[tokio::test]
async fn register_uploads_optional_cover_image() {
    let (_, _, service) = service(StubUploader::ok());
    let dir = tempfile::tempdir().unwrap();

    let profile = service
        .register(
            registration(),
            Some(staged_file(dir.path(), "avatar")),
            Some(staged_file(dir.path(), "coverImage")),
        )
        .await
        .unwrap();

    assert!(
        profile
            .cover_image_url
            .as_deref()
            .unwrap()
            .starts_with("https://media.test/coverImage-")
    );
}

#[tokio::test]
async fn register_rejects_empty_fields() {
    let (_, _, service) = service(StubUploader::ok());
    let dir = tempfile::tempdir().unwrap();

    let mut bad = registration();
    bad.fullname = "  ".to_string();

    let err = service
        .register(bad, Some(staged_file(dir.path(), "avatar")), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::Validation { .. }));
}

#[tokio::test]
async fn register_rejects_duplicate_username_or_email() {
    let (_, _, service) = service(StubUploader::ok());
    let dir = tempfile::tempdir().unwrap();

    service
        .register(registration(), Some(staged_file(dir.path(), "avatar")), None)
        .await
        .unwrap();

    // Same username, different case and email.
    let mut again = registration();
    again.email = "other@x.com".to_string();
    let err = service
        .register(again, Some(staged_file(dir.path(), "avatar")), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::Duplicate { .. }));

    // Different username, same email.
    let mut again = registration();
    again.username = "bob".to_string();
    let err = service
        .register(again, Some(staged_file(dir.path(), "avatar")), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::Duplicate { .. }));
}

#[tokio::test]
async fn register_requires_an_avatar_file() {
    let (_, _, service) = service(StubUploader::ok());

    let err = service.register(registration(), None, None).await.unwrap_err();
    assert!(matches!(err, AccountsError::Validation { .. }));
}

#[tokio::test]
async fn register_fails_when_media_host_rejects_avatar() {
    let (store, media, service) = service(StubUploader::failing());
    let dir = tempfile::tempdir().unwrap();
    let avatar = staged_file(dir.path(), "avatar");
    let avatar_path = avatar.path.clone();

    let err = service
        .register(registration(), Some(avatar), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::Validation { .. }));

    // The collaborator still removed the staged file, and nothing was stored.
    assert!(media.removed.lock().unwrap().contains(&avatar_path));
    assert!(!avatar_path.exists());
    let stored = store
        .find_by_username_or_email(Some("alice"), None)
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn register_survives_cover_image_rejection() {
    // Avatar upload succeeds, cover upload fails: the account is still
    // created, just without a cover URL.
    let (_, _, service) = service(StubUploader::failing_for("coverImage"));
    let dir = tempfile::tempdir().unwrap();

    let profile = service
        .register(
            registration(),
            Some(staged_file(dir.path(), "avatar")),
            Some(staged_file(dir.path(), "coverImage")),
        )
        .await
        .unwrap();

    assert!(profile.avatar_url.starts_with("https://media.test/avatar-"));
    assert!(profile.cover_image_url.is_none());
}
