//! Showroom Services Layer
//!
//! Business services sitting between the HTTP handlers and the media host:
//! the [`MediaStore`] adapter (compress, upload, delete by URL) and the
//! [`CleanupQueue`] background worker that removes staged files and orphaned
//! remote assets after the response has been sent. The API crate depends on
//! this facade rather than on storage and processing directly.

pub mod cleanup;
pub mod media_store;

pub use cleanup::{CleanupJob, CleanupQueue, CleanupSettings, CleanupSnapshot, CleanupStats, CleanupWorker};
pub use media_store::{MediaFolders, MediaStore};
pub use showroom_processing::CompressionSettings;
pub use showroom_storage::{
    create_media_host, MediaHost, RemoteAsset, ResourceType, StorageError, StorageResult,
};
