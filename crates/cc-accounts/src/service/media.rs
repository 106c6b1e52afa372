//! Media Host Collaborator
//!
//! Narrow contract around the third-party media host: upload a staged local
//! file, get back a hosted URL or `None`. The staged file is deleted in both
//! outcomes. Upload failures are logged here and never propagate as errors.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, warn};

use crate::error::Result;

/// A successfully hosted asset.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub url: String,
}

/// A multipart upload staged to the local temp directory, waiting to be
/// pushed to the media host.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: PathBuf,
    pub original_name: Option<String>,
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Push a staged file to the media host. `Ok(None)` means the host
    /// rejected it (detail already logged). The staged file is removed
    /// regardless of outcome.
    async fn upload(&self, local_path: &Path) -> Result<Option<MediaAsset>>;
}

/// reqwest-backed client for the media host. Constructed once at startup and
/// passed to whoever needs it; there is no process-global instance.
pub struct MediaHostClient {
    http: reqwest::Client,
    upload_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl MediaHostClient {
    pub fn new(http: reqwest::Client, upload_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            upload_url: upload_url.into(),
            api_key,
        }
    }

    async fn push(&self, local_path: &Path) -> Result<MediaAsset> {
        let bytes = tokio::fs::read(local_path).await?;
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name(file_name));

        let mut request = self.http.post(&self.upload_url).multipart(form);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?.error_for_status()?;
        let body: UploadResponse = response.json().await?;
        Ok(MediaAsset { url: body.url })
    }
}

#[async_trait]
impl MediaUploader for MediaHostClient {
    async fn upload(&self, local_path: &Path) -> Result<Option<MediaAsset>> {
        let outcome = self.push(local_path).await;

        if let Err(e) = tokio::fs::remove_file(local_path).await {
            warn!(path = %local_path.display(), error = %e, "failed to remove staged file");
        }

        match outcome {
            Ok(asset) => Ok(Some(asset)),
            Err(e) => {
                error!(path = %local_path.display(), error = %e, "media host upload failed");
                Ok(None)
            }
        }
    }
}
