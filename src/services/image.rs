use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::images::{ALLOWED_CONTENT_TYPES, DEFAULT_EXTENSION};
use crate::services::storage::ObjectStorage;

/// An uploaded file held in memory.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Not an image! Please upload an image (got {0})")]
    InvalidFileType(String),

    #[error("Image is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("Image upload failed: {0}")]
    UploadFailed(String),
}

pub struct ImageService {
    storage: Arc<dyn ObjectStorage>,
    max_bytes: usize,
}

impl ImageService {
    #[must_use]
    pub fn new(storage: Arc<dyn ObjectStorage>, max_bytes: usize) -> Self {
        Self { storage, max_bytes }
    }

    /// Validates the upload and hands it to object storage, returning its public URL.
    pub async fn ingest(&self, upload: ImageUpload) -> Result<String, ImageError> {
        let content_type = upload
            .content_type
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let content_type = content_type.as_str();
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(ImageError::InvalidFileType(if content_type.is_empty() {
                "no content type".to_string()
            } else {
                content_type.to_string()
            }));
        }

        let size = upload.bytes.len();
        if size > self.max_bytes {
            return Err(ImageError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        // The client's file name never reaches the key; the served type
        // follows the extension.
        let extension = extension_for(content_type);
        let key = format!("sweet-{}.{extension}", Uuid::new_v4());

        info!(key = %key, size, content_type, "Ingesting image");

        self.storage
            .put(&key, content_type, upload.bytes)
            .await
            .map_err(|e| {
                warn!(key = %key, error = %e, "Image upload failed");
                ImageError::UploadFailed(e.to_string())
            })
    }
}

fn extension_for(content_type: &str) -> String {
    match content_type {
        "image/jpeg" => "jpg".to_string(),
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first())
            .map_or_else(|| DEFAULT_EXTENSION.to_string(), |ext| (*ext).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::StorageError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStorage {
        keys: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ObjectStorage for RecordingStorage {
        async fn put(
            &self,
            key: &str,
            _content_type: &str,
            _bytes: Vec<u8>,
        ) -> Result<String, StorageError> {
            self.keys.lock().unwrap().push(key.to_string());
            Ok(format!("https://cdn.example.com/{key}"))
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl ObjectStorage for FailingStorage {
        async fn put(
            &self,
            _key: &str,
            _content_type: &str,
            _bytes: Vec<u8>,
        ) -> Result<String, StorageError> {
            Err(StorageError::MissingUrl)
        }
    }

    fn upload(content_type: &str, size: usize) -> ImageUpload {
        ImageUpload {
            file_name: Some("lava-cake.PNG".to_string()),
            content_type: Some(content_type.to_string()),
            bytes: vec![0; size],
        }
    }

    #[tokio::test]
    async fn test_ingest_stores_image() {
        let storage = Arc::new(RecordingStorage::default());
        let service = ImageService::new(storage.clone(), 1024);

        let url = service.ingest(upload("image/png", 10)).await.unwrap();

        let keys = storage.keys.lock().unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with("sweet-"));
        assert!(keys[0].ends_with(".png"));
        assert_eq!(url, format!("https://cdn.example.com/{}", keys[0]));
    }

    #[tokio::test]
    async fn test_ingest_rejects_non_image() {
        let storage = Arc::new(RecordingStorage::default());
        let service = ImageService::new(storage.clone(), 1024);

        let err = service.ingest(upload("text/plain", 10)).await.unwrap_err();
        assert!(matches!(err, ImageError::InvalidFileType(_)));

        let err = service
            .ingest(ImageUpload {
                content_type: None,
                ..upload("image/png", 10)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ImageError::InvalidFileType(_)));

        assert!(storage.keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_rejects_oversized_image() {
        let service = ImageService::new(Arc::new(RecordingStorage::default()), 1024);

        let err = service.ingest(upload("image/png", 1025)).await.unwrap_err();
        assert!(matches!(
            err,
            ImageError::TooLarge {
                size: 1025,
                limit: 1024
            }
        ));
    }

    #[tokio::test]
    async fn test_storage_failure_becomes_upload_failed() {
        let service = ImageService::new(Arc::new(FailingStorage), 1024);

        let err = service.ingest(upload("image/png", 10)).await.unwrap_err();
        assert!(matches!(err, ImageError::UploadFailed(_)));
    }

    #[tokio::test]
    async fn test_ingest_ignores_client_file_name() {
        let storage = Arc::new(RecordingStorage::default());
        let service = ImageService::new(storage.clone(), 1024);

        service
            .ingest(ImageUpload {
                file_name: Some("evil.html".to_string()),
                content_type: Some("image/png".to_string()),
                bytes: b"<script>alert(1)</script>".to_vec(),
            })
            .await
            .unwrap();

        let keys = storage.keys.lock().unwrap();
        assert!(keys[0].ends_with(".png"), "{}", keys[0]);
    }

    #[tokio::test]
    async fn test_ingest_rejects_scriptable_image_types() {
        let storage = Arc::new(RecordingStorage::default());
        let service = ImageService::new(storage.clone(), 1024);

        for content_type in ["image/svg+xml", "image/x-icon", "text/html"] {
            let err = service.ingest(upload(content_type, 10)).await.unwrap_err();
            assert!(matches!(err, ImageError::InvalidFileType(_)), "{content_type}");
        }
        assert!(storage.keys.lock().unwrap().is_empty());
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/gif"), "gif");
        assert_eq!(extension_for("image/webp"), "webp");
    }
}
