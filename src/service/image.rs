//! Image reference resolution. An event's `image_url` comes from exactly
//! one of three places, in priority order: an uploaded asset, an explicit
//! URL, or a placeholder synthesized from the event type.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use log::{error, info};

use crate::dto::UploadedImage;
use crate::errors::ApiError;
use crate::models::EventType;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Where resolved uploads live. `release` must delete only references the
/// store itself produced; passthrough URLs and placeholders are never its
/// property.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn store(&self, upload: &UploadedImage) -> Result<String, ApiError>;
    /// Returns true when an underlying asset was actually removed.
    async fn release(&self, image_ref: &str) -> bool;
}

pub fn placeholder_url(event_type: EventType) -> String {
    format!(
        "https://source.unsplash.com/random/300x200/?{}",
        event_type.placeholder_keyword()
    )
}

pub struct ImageResolver {
    assets: Arc<dyn AssetStore>,
}

impl ImageResolver {
    pub fn new(assets: Arc<dyn AssetStore>) -> Self {
        Self { assets }
    }

    pub async fn resolve(
        &self,
        existing: Option<&str>,
        upload: Option<UploadedImage>,
        event_type: EventType,
    ) -> Result<String, ApiError> {
        if let Some(file) = upload {
            if file.data.len() > MAX_IMAGE_BYTES {
                return Err(ApiError::Validation(
                    "Image file is too large (max 5MB)".to_string(),
                ));
            }
            let content_type = file.content_type.as_deref().unwrap_or("");
            if !content_type.starts_with("image/") {
                return Err(ApiError::Validation(
                    "Please upload only images".to_string(),
                ));
            }
            return self.assets.store(&file).await;
        }
        if let Some(url) = existing {
            let url = url.trim();
            if !url.is_empty() {
                return Ok(url.to_string());
            }
        }
        Ok(placeholder_url(event_type))
    }

    pub async fn release(&self, image_ref: &str) {
        if self.assets.release(image_ref).await {
            info!("released image asset {image_ref}");
        }
    }
}

/// Uploads written under a directory served at `/uploads`, one file per
/// asset, named after the upload instant like the original disk layout.
pub struct DiskAssetStore {
    dir: PathBuf,
}

impl DiskAssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}

#[async_trait]
impl AssetStore for DiskAssetStore {
    async fn store(&self, upload: &UploadedImage) -> Result<String, ApiError> {
        let ext = upload
            .file_name
            .as_deref()
            .and_then(file_extension)
            .unwrap_or_default();
        let name = format!("image-{}{}", Utc::now().timestamp_millis(), ext);
        let path = self.dir.join(&name);
        tokio::fs::write(&path, &upload.data).await.map_err(|err| {
            error!("failed to write upload {}: {err}", path.display());
            ApiError::Internal
        })?;
        Ok(format!("/uploads/{name}"))
    }

    async fn release(&self, image_ref: &str) -> bool {
        match image_ref.strip_prefix("/uploads/") {
            Some(name) if !name.is_empty() && !name.contains('/') => {
                tokio::fs::remove_file(self.dir.join(name)).await.is_ok()
            }
            _ => false,
        }
    }
}

/// Asset store for deployments without durable file storage: the bytes are
/// inlined into the reference itself as a data URL, so there is nothing to
/// release later.
pub struct InlineAssetStore;

#[async_trait]
impl AssetStore for InlineAssetStore {
    async fn store(&self, upload: &UploadedImage) -> Result<String, ApiError> {
        let content_type = upload
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");
        Ok(format!(
            "data:{};base64,{}",
            content_type,
            BASE64.encode(&upload.data)
        ))
    }

    async fn release(&self, _image_ref: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn upload(content_type: &str, size: usize) -> UploadedImage {
        UploadedImage {
            file_name: Some("photo.png".to_string()),
            content_type: Some(content_type.to_string()),
            data: vec![7u8; size],
        }
    }

    fn resolver() -> ImageResolver {
        ImageResolver::new(Arc::new(InlineAssetStore))
    }

    #[actix_rt::test]
    async fn oversized_upload_is_rejected() {
        let err = resolver()
            .resolve(None, Some(upload("image/png", MAX_IMAGE_BYTES + 1)), EventType::Other)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[actix_rt::test]
    async fn non_image_media_type_is_rejected() {
        let err = resolver()
            .resolve(None, Some(upload("application/pdf", 64)), EventType::Other)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[actix_rt::test]
    async fn upload_takes_priority_over_existing_url() {
        let url = resolver()
            .resolve(
                Some("https://example.com/old.png"),
                Some(upload("image/png", 64)),
                EventType::Other,
            )
            .await
            .unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[actix_rt::test]
    async fn explicit_url_passes_through_unchanged() {
        let url = resolver()
            .resolve(Some("https://example.com/a.png"), None, EventType::Sports)
            .await
            .unwrap();
        assert_eq!(url, "https://example.com/a.png");
    }

    #[actix_rt::test]
    async fn missing_image_synthesizes_typed_placeholder() {
        let url = resolver().resolve(None, None, EventType::Sports).await.unwrap();
        assert_eq!(url, "https://source.unsplash.com/random/300x200/?sports");
        let blank = resolver()
            .resolve(Some("   "), None, EventType::Technical)
            .await
            .unwrap();
        assert_eq!(blank, "https://source.unsplash.com/random/300x200/?technical");
    }

    #[actix_rt::test]
    async fn disk_store_roundtrip_and_release() {
        let dir = std::env::temp_dir().join(format!("college-events-{}", Uuid::new_v4()));
        let store = DiskAssetStore::new(&dir).unwrap();
        let image_ref = store.store(&upload("image/png", 64)).await.unwrap();
        assert!(image_ref.starts_with("/uploads/image-"));
        assert!(image_ref.ends_with(".png"));

        // Only refs the store produced may be deleted.
        assert!(!store.release("https://example.com/a.png").await);
        assert!(!store.release("/uploads/../etc/passwd").await);
        assert!(store.release(&image_ref).await);
        assert!(!store.release(&image_ref).await);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_rt::test]
    async fn inline_store_owns_nothing() {
        let store = InlineAssetStore;
        let image_ref = store.store(&upload("image/gif", 8)).await.unwrap();
        assert!(image_ref.starts_with("data:image/gif;base64,"));
        assert!(!store.release(&image_ref).await);
    }
}
