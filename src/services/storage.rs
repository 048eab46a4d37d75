//! Object storage backends for uploaded images.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload response carried no URL")]
    MissingUrl,
}

/// Somewhere to put image bytes that hands back a public URL.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>)
    -> Result<String, StorageError>;
}

pub fn build_storage(config: &StorageConfig) -> anyhow::Result<Arc<dyn ObjectStorage>> {
    match config.backend {
        StorageBackend::Local => Ok(Arc::new(LocalObjectStorage::new(
            &config.images_path,
            &config.public_base_url,
        )?)),
        StorageBackend::Http => {
            let upload_url = config
                .upload_url
                .as_deref()
                .context("storage.upload_url is required for the http backend")?;
            Ok(Arc::new(HttpObjectStorage::new(
                upload_url,
                config.upload_token.clone(),
                config.request_timeout_seconds,
            )?))
        }
    }
}

/// Writes images to a directory that the API serves under `/images`.
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: &str, public_base_url: &str) -> anyhow::Result<Self> {
        let base = url::Url::parse(public_base_url)
            .with_context(|| format!("Invalid storage.public_base_url: {public_base_url}"))?;

        Ok(Self {
            root: PathBuf::from(root),
            public_base_url: base.as_str().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(
        &self,
        key: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await?;
        }

        let file_path = self.root.join(key);
        fs::write(&file_path, bytes).await?;

        info!(path = %file_path.display(), "Stored image locally");

        Ok(format!("{}/images/{key}", self.public_base_url))
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
    secure_url: Option<String>,
}

/// Sends images to a remote upload endpoint as `multipart/form-data`.
pub struct HttpObjectStorage {
    client: reqwest::Client,
    upload_url: url::Url,
    token: Option<String>,
}

impl HttpObjectStorage {
    pub fn new(upload_url: &str, token: Option<String>, timeout_seconds: u64) -> anyhow::Result<Self> {
        let upload_url = url::Url::parse(upload_url)
            .with_context(|| format!("Invalid storage.upload_url: {upload_url}"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent("SweetShop/1.0")
            .build()
            .context("Failed to build upload HTTP client")?;

        Ok(Self {
            client,
            upload_url,
            token,
        })
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(key.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .text("key", key.to_string())
            .part("file", part);

        let mut request = self.client.post(self.upload_url.clone()).multipart(form);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let body: UploadResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let url = body
            .secure_url
            .or(body.url)
            .filter(|u| !u.is_empty())
            .ok_or(StorageError::MissingUrl)?;

        info!(key, url = %url, "Uploaded image");

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_storage_writes_file_and_returns_url() {
        let root = std::env::temp_dir().join(format!("sweetshop-images-{}", uuid::Uuid::new_v4()));
        let storage =
            LocalObjectStorage::new(root.to_str().unwrap(), "http://localhost:5000/").unwrap();

        let url = storage
            .put("sweet-test.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:5000/images/sweet-test.png");
        assert_eq!(std::fs::read(root.join("sweet-test.png")).unwrap(), vec![1, 2, 3]);

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_local_storage_rejects_bad_base_url() {
        assert!(LocalObjectStorage::new("images", "not a url").is_err());
    }

    #[test]
    fn test_build_storage_requires_upload_url_for_http() {
        let config = StorageConfig {
            backend: StorageBackend::Http,
            upload_url: None,
            ..StorageConfig::default()
        };
        assert!(build_storage(&config).is_err());
    }
}
