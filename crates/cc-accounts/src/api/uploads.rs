//! Multipart Staging
//!
//! Writes incoming multipart parts to the local temp directory before the
//! media-host upload, with a unique name per file. One file per field name;
//! later duplicates are ignored.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;

use crate::error::{AccountsError, Result};
use crate::service::media::StagedFile;

#[derive(Debug, Default)]
pub struct StagedUploads {
    texts: HashMap<String, String>,
    files: HashMap<String, StagedFile>,
}

impl StagedUploads {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    pub fn take_file(&mut self, name: &str) -> Option<StagedFile> {
        self.files.remove(name)
    }
}

pub async fn stage_uploads(mut multipart: Multipart, dir: &Path) -> Result<StagedUploads> {
    tokio::fs::create_dir_all(dir).await?;

    let mut staged = StagedUploads::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AccountsError::validation(format!("malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let original_name = field.file_name().map(str::to_string);
        if original_name.is_some() {
            if staged.files.contains_key(&name) {
                continue;
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AccountsError::validation(format!("failed to read upload: {}", e)))?;
            let path = dir.join(format!("{}-{}", name, uuid::Uuid::new_v4()));
            tokio::fs::write(&path, &bytes).await?;
            staged.files.insert(name, StagedFile { path, original_name });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AccountsError::validation(format!("failed to read field: {}", e)))?;
            staged.texts.insert(name, value);
        }
    }

    Ok(staged)
}
