//! Media host abstraction
//!
//! This module defines the MediaHost trait that all remote media backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// Media host operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Invalid public id: {0}")]
    InvalidKey(String),

    #[error("Media host error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for media host operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Resource type of an asset on the host. Decides the upload endpoint and the
/// `/{type}/upload/` segment of the delivered URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Image,
    Video,
    Raw,
    /// Let the host detect the type. Only valid for uploads.
    Auto,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
            ResourceType::Raw => "raw",
            ResourceType::Auto => "auto",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// An asset accepted by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAsset {
    /// HTTPS delivery URL; this is what gets persisted.
    pub secure_url: String,
    /// Host-side identifier, folder included (`showroom_images/abc123`).
    pub public_id: String,
}

/// Remote media host
///
/// Implementations must be cheap to share behind an `Arc`; every request handler
/// and the cleanup worker hold the same instance.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload bytes under `folder`. `filename` supplies the extension the host
    /// uses to name the delivered file.
    async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        folder: &str,
        resource_type: ResourceType,
    ) -> StorageResult<RemoteAsset>;

    /// Remove an asset by public id. Deleting an asset that is already gone is not
    /// an error.
    async fn destroy(&self, public_id: &str, resource_type: ResourceType) -> StorageResult<()>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
