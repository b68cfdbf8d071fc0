use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;

use showroom_core::{AppError, Config, MediaKind, MediaReference};
use showroom_processing::{is_compressible_extension, CompressionSettings, ImageCompressor};
use showroom_storage::{
    extract_public_id, resource_type_from_url, MediaHost, ResourceType, StorageError,
};

/// Destination folders on the media host
#[derive(Debug, Clone)]
pub struct MediaFolders {
    pub images: String,
    pub files: String,
    pub videos: String,
}

impl MediaFolders {
    pub fn from_config(config: &Config) -> Self {
        Self {
            images: config.media.image_folder.clone(),
            files: config.media.file_folder.clone(),
            videos: config.media.video_folder.clone(),
        }
    }
}

/// Upload and delete media on the configured host.
///
/// Images are re-encoded before upload; anything that cannot be decoded goes up
/// untouched as a plain file. Deletion is advisory: failures are logged, never
/// returned.
#[derive(Clone)]
pub struct MediaStore {
    host: Arc<dyn MediaHost>,
    compressor: Arc<ImageCompressor>,
    folders: MediaFolders,
}

fn upload_error(err: StorageError) -> AppError {
    AppError::Upload(err.to_string())
}

impl MediaStore {
    pub fn new(
        host: Arc<dyn MediaHost>,
        compression: CompressionSettings,
        folders: MediaFolders,
    ) -> Self {
        Self {
            host,
            compressor: Arc::new(ImageCompressor::new(compression)),
            folders,
        }
    }

    pub fn from_config(host: Arc<dyn MediaHost>, config: &Config) -> Self {
        let compression = CompressionSettings {
            primary_quality: config.media.image_primary_quality,
            fallback_quality: config.media.image_fallback_quality,
            size_threshold_bytes: config.media.image_size_threshold_bytes,
        };
        Self::new(host, compression, MediaFolders::from_config(config))
    }

    pub fn host_name(&self) -> &'static str {
        self.host.name()
    }

    /// Upload the staged file at `path` as `kind`.
    #[tracing::instrument(skip(self), fields(media.kind = kind.as_str()))]
    pub async fn upload(&self, path: &Path, kind: MediaKind) -> Result<MediaReference, AppError> {
        let data = Bytes::from(tokio::fs::read(path).await?);
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin");
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match kind {
            MediaKind::Image if is_compressible_extension(&ext) => {
                self.upload_image(data, filename, &ext).await
            }
            MediaKind::Image => {
                let asset = self
                    .host
                    .upload(data, filename, &self.folders.images, ResourceType::Image)
                    .await
                    .map_err(upload_error)?;
                Ok(MediaReference::image(asset.secure_url))
            }
            MediaKind::Video => {
                let asset = self
                    .host
                    .upload(data, filename, &self.folders.videos, ResourceType::Video)
                    .await
                    .map_err(upload_error)?;
                Ok(MediaReference::video(asset.secure_url))
            }
            MediaKind::File => self.upload_file(data, filename).await,
        }
    }

    async fn upload_image(
        &self,
        data: Bytes,
        filename: &str,
        ext: &str,
    ) -> Result<MediaReference, AppError> {
        let compressor = self.compressor.clone();
        let original = data.clone();
        let compressed = tokio::task::spawn_blocking(move || compressor.compress(original))
            .await
            .map_err(|e| AppError::Internal(format!("Compression task failed: {}", e)))?;

        let artifact = match compressed {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::warn!(error = %e, filename, "Image could not be decoded, uploading as file");
                return self.upload_file(data, filename).await;
            }
        };

        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let upload_name = format!("{}.{}", stem, artifact.format.extension(ext));

        tracing::debug!(
            original_size = artifact.original_size,
            upload_size = artifact.data.len(),
            format = ?artifact.format,
            "Uploading image"
        );

        let asset = self
            .host
            .upload(
                artifact.data,
                &upload_name,
                &self.folders.images,
                ResourceType::Image,
            )
            .await
            .map_err(upload_error)?;
        Ok(MediaReference::image(asset.secure_url))
    }

    async fn upload_file(&self, data: Bytes, filename: &str) -> Result<MediaReference, AppError> {
        let asset = self
            .host
            .upload(data, filename, &self.folders.files, ResourceType::Auto)
            .await
            .map_err(upload_error)?;
        Ok(MediaReference::file(asset.secure_url))
    }

    /// Best-effort remote delete. Returns whether the host confirmed the removal.
    #[tracing::instrument(skip(self), fields(media.url = %reference.url))]
    pub async fn delete(&self, reference: &MediaReference) -> bool {
        let resource_type = match reference.kind {
            MediaKind::Video => ResourceType::Video,
            _ => resource_type_from_url(&reference.url),
        };

        let Some(public_id) = extract_public_id(&reference.url, resource_type) else {
            tracing::warn!("Could not extract public id from URL, skipping remote delete");
            return false;
        };

        match self.host.destroy(&public_id, resource_type).await {
            Ok(()) => {
                tracing::debug!(public_id = %public_id, "Remote asset deleted");
                true
            }
            Err(e) => {
                tracing::warn!(public_id = %public_id, error = %e, "Remote delete failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom_storage::LocalHost;
    use tempfile::TempDir;

    async fn store(media: &TempDir) -> MediaStore {
        let host = LocalHost::new(media.path(), "http://media.test".to_string())
            .await
            .unwrap();
        MediaStore::new(
            Arc::new(host),
            CompressionSettings::default(),
            MediaFolders {
                images: "imgs".into(),
                files: "files".into(),
                videos: "vids".into(),
            },
        )
    }

    #[tokio::test]
    async fn test_undecodable_image_is_uploaded_as_file() {
        let media = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        let path = staging.path().join("images-1-abc.jpg");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let reference = store(&media).await.upload(&path, MediaKind::Image).await.unwrap();
        assert_eq!(reference.kind, MediaKind::File);
        assert!(reference.url.contains("/files/"));
    }

    #[tokio::test]
    async fn test_document_uploads_raw_and_deletes() {
        let media = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        let path = staging.path().join("attachment-1-abc.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let store = store(&media).await;
        let reference = store.upload(&path, MediaKind::File).await.unwrap();
        assert!(reference.url.contains("/raw/upload/"));
        assert!(reference.url.ends_with(".pdf"));

        assert!(store.delete(&reference).await);
        let remaining = std::fs::read_dir(media.path().join("raw").join("files"))
            .unwrap()
            .count();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_video_goes_to_video_folder_and_deletes() {
        let media = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        let path = staging.path().join("video-1-abc.mp4");
        std::fs::write(&path, b"\0\0\0\x18ftypmp42").unwrap();

        let store = store(&media).await;
        let reference = store.upload(&path, MediaKind::Video).await.unwrap();
        assert!(reference.url.contains("/video/upload/"));
        assert!(reference.url.contains("/vids/"));

        assert!(store.delete(&reference).await);
    }

    #[tokio::test]
    async fn test_delete_of_foreign_url_is_a_logged_no_op() {
        let media = TempDir::new().unwrap();
        let store = store(&media).await;
        assert!(
            !store
                .delete(&MediaReference::image("https://elsewhere.example/pic"))
                .await
        );
    }
}
