//! In-memory media host that records uploads and deletes.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use showroom_services::{MediaHost, RemoteAsset, ResourceType, StorageError, StorageResult};

pub const HOST_BASE: &str = "https://media.test/demo";

/// Accepts every upload (except the configured failing one) and remembers the
/// public ids it handed out and the ones it was asked to destroy.
#[derive(Default)]
pub struct RecordingHost {
    attempts: AtomicUsize,
    fail_on_attempt: Option<usize>,
    uploaded: Mutex<Vec<String>>,
    destroyed: Mutex<Vec<String>>,
}

impl RecordingHost {
    /// Host whose `n`-th upload attempt (1-based) fails.
    pub fn failing_on(n: usize) -> Self {
        Self {
            fail_on_attempt: Some(n),
            ..Self::default()
        }
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploaded.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaHost for RecordingHost {
    async fn upload(
        &self,
        _data: Bytes,
        filename: &str,
        folder: &str,
        resource_type: ResourceType,
    ) -> StorageResult<RemoteAsset> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_attempt == Some(attempt) {
            return Err(StorageError::UploadFailed(format!(
                "refusing upload #{}",
                attempt
            )));
        }

        let ext = filename.rsplit_once('.').map(|(_, e)| e).unwrap_or("bin");
        let (kind, public_id) = match resource_type {
            ResourceType::Video => ("video", format!("{}/asset{}", folder, attempt)),
            ResourceType::Image => ("image", format!("{}/asset{}", folder, attempt)),
            // Documents land as raw assets, whose ids keep the extension.
            _ => ("raw", format!("{}/asset{}.{}", folder, attempt, ext)),
        };
        self.uploaded.lock().unwrap().push(public_id.clone());

        let secure_url = if kind == "raw" {
            format!("{}/raw/upload/v1/{}", HOST_BASE, public_id)
        } else {
            format!("{}/{}/upload/v1/{}.{}", HOST_BASE, kind, public_id, ext)
        };
        Ok(RemoteAsset {
            secure_url,
            public_id,
        })
    }

    async fn destroy(&self, public_id: &str, _resource_type: ResourceType) -> StorageResult<()> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
