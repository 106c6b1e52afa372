//! Media host client tests
//!
//! Drives `MediaHostClient` against a mock media host: the URL comes back on
//! success, failures collapse to `None`, and the staged file is removed in
//! both outcomes.

use cc_accounts::service::{MediaHostClient, MediaUploader};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn staged_file(dir: &std::path::Path) -> std::path::PathBuf {
    let file = dir.join(format!("avatar-{}", uuid::Uuid::new_v4()));
    std::fs::write(&file, b"png-bytes").unwrap();
    file
}

#[tokio::test]
async fn upload_returns_hosted_url_and_removes_staged_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": "https://media.test/abc.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = staged_file(dir.path());

    let client = MediaHostClient::new(reqwest::Client::new(), format!("{}/upload", server.uri()), None);
    let asset = client.upload(&file).await.unwrap();

    assert_eq!(asset.unwrap().url, "https://media.test/abc.png");
    assert!(!file.exists());
}

#[tokio::test]
async fn upload_sends_bearer_auth_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("authorization", "Bearer media-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": "https://media.test/abc.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = staged_file(dir.path());

    let client = MediaHostClient::new(
        reqwest::Client::new(),
        format!("{}/upload", server.uri()),
        Some("media-key".to_string()),
    );
    assert!(client.upload(&file).await.unwrap().is_some());
}

#[tokio::test]
async fn host_failure_returns_none_and_removes_staged_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = staged_file(dir.path());

    let client = MediaHostClient::new(reqwest::Client::new(), format!("{}/upload", server.uri()), None);
    let asset = client.upload(&file).await.unwrap();

    assert!(asset.is_none());
    assert!(!file.exists());
}

#[tokio::test]
async fn missing_staged_file_returns_none() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("never-staged");

    let client = MediaHostClient::new(reqwest::Client::new(), format!("{}/upload", server.uri()), None);
    let asset = client.upload(&file).await.unwrap();
    assert!(asset.is_none());
}
