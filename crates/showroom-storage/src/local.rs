use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::traits::{MediaHost, RemoteAsset, ResourceType, StorageError, StorageResult};

/// Local filesystem media host
///
/// Files live at `{base_path}/{resource_type}/{folder}/{id}.{ext}` and are delivered as
/// `{base_url}/{resource_type}/upload/v{timestamp}/{folder}/{id}.{ext}`; the router
/// serves `base_path` so the version segment is stripped on the way in.
#[derive(Clone)]
pub struct LocalHost {
    base_path: PathBuf,
    base_url: String,
}

impl LocalHost {
    /// Create a new LocalHost instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored media (e.g., "./media")
    /// * `base_url` - Base URL the directory is served under (e.g., "http://localhost:5000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create media directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalHost {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Folder and public ids must stay relative and inside the media directory.
    fn check_relative(value: &str) -> StorageResult<()> {
        let path = Path::new(value);
        if value.is_empty()
            || path.is_absolute()
            || path
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(value.to_string()));
        }
        Ok(())
    }

    /// Uploads with `Auto` land under `image` when the extension says so, `raw` otherwise.
    fn concrete_type(resource_type: ResourceType, ext: &str) -> ResourceType {
        match resource_type {
            ResourceType::Auto => match ext {
                "jpg" | "jpeg" | "png" | "gif" | "webp" => ResourceType::Image,
                "mp4" | "webm" | "mov" => ResourceType::Video,
                _ => ResourceType::Raw,
            },
            other => other,
        }
    }

    fn type_dir(&self, resource_type: ResourceType) -> PathBuf {
        self.base_path.join(resource_type.as_str())
    }
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string())
}

#[async_trait]
impl MediaHost for LocalHost {
    #[tracing::instrument(skip(self, data), fields(host = "local", size = data.len()))]
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        folder: &str,
        resource_type: ResourceType,
    ) -> StorageResult<RemoteAsset> {
        Self::check_relative(folder)?;

        let ext = extension_of(filename);
        let resource_type = Self::concrete_type(resource_type, &ext);
        let id = Uuid::new_v4().simple().to_string();
        // Raw public ids keep their extension, as on Cloudinary.
        let public_id = match resource_type {
            ResourceType::Raw => format!("{}/{}.{}", folder, id, ext),
            _ => format!("{}/{}", folder, id),
        };
        let stored_name = match resource_type {
            ResourceType::Raw => public_id.clone(),
            _ => format!("{}.{}", public_id, ext),
        };

        let path = self.type_dir(resource_type).join(&stored_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let version = chrono::Utc::now().timestamp();
        let secure_url = format!(
            "{}/{}/upload/v{}/{}",
            self.base_url, resource_type, version, stored_name
        );

        tracing::debug!(path = %path.display(), "Asset stored locally");

        Ok(RemoteAsset {
            secure_url,
            public_id,
        })
    }

    #[tracing::instrument(skip(self), fields(host = "local"))]
    async fn destroy(&self, public_id: &str, resource_type: ResourceType) -> StorageResult<()> {
        Self::check_relative(public_id)?;
        if resource_type == ResourceType::Auto {
            return Err(StorageError::InvalidKey(
                "destroy needs a concrete resource type".to_string(),
            ));
        }

        let target = self.type_dir(resource_type).join(public_id);
        let (Some(dir), Some(name)) = (target.parent(), target.file_name()) else {
            return Err(StorageError::InvalidKey(public_id.to_string()));
        };

        // Image and video ids carry no extension; raw ids name the file exactly.
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.file_name() == Some(name) || path.file_stem() == Some(name) {
                fs::remove_file(&path).await.map_err(|e| {
                    StorageError::DeleteFailed(format!(
                        "Failed to delete {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
