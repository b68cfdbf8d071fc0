//! Background cleanup of staged files and orphaned remote assets
//!
//! Handlers never wait for cleanup. They push a [`CleanupJob`] onto an unbounded
//! channel and respond; the worker spawned by [`CleanupQueue::start`] runs each
//! job on its own task. On shutdown the worker stops accepting jobs, runs what is
//! already queued and waits for in-flight jobs before exiting.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use showroom_core::{Config, MediaReference};
use showroom_storage::{safe_unlink, RetryPolicy, UnlinkOutcome};

use crate::media_store::MediaStore;

#[derive(Debug, Clone)]
pub enum CleanupJob {
    /// Staged upload files to remove from local disk
    LocalFiles(Vec<PathBuf>),
    /// Remote assets that no document references any more
    RemoteAssets(Vec<MediaReference>),
}

#[derive(Debug, Clone, Copy)]
pub struct CleanupSettings {
    /// Wait before the first removal attempt so open handles can close.
    pub initial_delay: Duration,
    pub retry: RetryPolicy,
}

impl CleanupSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_delay: config.cleanup.initial_delay,
            retry: RetryPolicy::new(config.cleanup.max_retries, config.cleanup.base_delay),
        }
    }
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            retry: RetryPolicy::default(),
        }
    }
}

/// Running totals, shared between the queue handle and the worker
#[derive(Debug, Default)]
pub struct CleanupStats {
    files_removed: AtomicU64,
    files_failed: AtomicU64,
    assets_removed: AtomicU64,
    assets_failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupSnapshot {
    pub files_removed: u64,
    pub files_failed: u64,
    pub assets_removed: u64,
    pub assets_failed: u64,
}

impl CleanupStats {
    pub fn snapshot(&self) -> CleanupSnapshot {
        CleanupSnapshot {
            files_removed: self.files_removed.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            assets_removed: self.assets_removed.load(Ordering::Relaxed),
            assets_failed: self.assets_failed.load(Ordering::Relaxed),
        }
    }
}

/// Cheap, cloneable handle for submitting cleanup jobs
#[derive(Clone)]
pub struct CleanupQueue {
    tx: mpsc::UnboundedSender<CleanupJob>,
    stats: Arc<CleanupStats>,
}

/// Owns the worker task; call [`CleanupWorker::shutdown`] once the server has stopped.
pub struct CleanupWorker {
    handle: JoinHandle<()>,
    shutdown_tx: mpsc::Sender<()>,
}

impl CleanupQueue {
    pub fn start(store: MediaStore, settings: CleanupSettings) -> (CleanupQueue, CleanupWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let stats = Arc::new(CleanupStats::default());

        let worker_stats = stats.clone();
        let handle = tokio::spawn(async move {
            worker_loop(rx, shutdown_rx, store, settings, worker_stats).await;
        });

        tracing::info!(
            initial_delay_ms = settings.initial_delay.as_millis() as u64,
            max_retries = settings.retry.max_retries,
            "Cleanup queue started"
        );

        (CleanupQueue { tx, stats }, CleanupWorker { handle, shutdown_tx })
    }

    pub fn submit(&self, job: CleanupJob) {
        let empty = match &job {
            CleanupJob::LocalFiles(paths) => paths.is_empty(),
            CleanupJob::RemoteAssets(refs) => refs.is_empty(),
        };
        if empty {
            return;
        }

        if let Err(e) = self.tx.send(job) {
            tracing::warn!(job = ?e.0, "Cleanup queue closed, job dropped");
        }
    }

    pub fn remove_local(&self, paths: Vec<PathBuf>) {
        self.submit(CleanupJob::LocalFiles(paths));
    }

    pub fn remove_remote(&self, references: Vec<MediaReference>) {
        self.submit(CleanupJob::RemoteAssets(references));
    }

    pub fn stats(&self) -> CleanupSnapshot {
        self.stats.snapshot()
    }
}

impl CleanupWorker {
    /// Stop accepting jobs, finish queued and running ones, then return.
    pub async fn shutdown(self) {
        if let Err(e) = self.shutdown_tx.send(()).await {
            tracing::warn!(error = %e, "Failed to send shutdown signal to cleanup worker");
        }
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Cleanup worker panicked");
        }
    }
}

async fn worker_loop(
    mut rx: mpsc::UnboundedReceiver<CleanupJob>,
    mut shutdown_rx: mpsc::Receiver<()>,
    store: MediaStore,
    settings: CleanupSettings,
    stats: Arc<CleanupStats>,
) {
    let mut running = JoinSet::new();

    loop {
        tokio::select! {
            job = rx.recv() => match job {
                Some(job) => {
                    running.spawn(run_job(job, store.clone(), settings, stats.clone()));
                }
                None => break,
            },
            Some(_) = running.join_next(), if !running.is_empty() => {}
            _ = shutdown_rx.recv() => {
                tracing::info!("Cleanup queue shutting down, draining pending jobs");
                rx.close();
                while let Some(job) = rx.recv().await {
                    running.spawn(run_job(job, store.clone(), settings, stats.clone()));
                }
                break;
            }
        }
    }

    while running.join_next().await.is_some() {}

    let totals = stats.snapshot();
    tracing::info!(
        files_removed = totals.files_removed,
        files_failed = totals.files_failed,
        assets_removed = totals.assets_removed,
        assets_failed = totals.assets_failed,
        "Cleanup queue stopped"
    );
}

async fn run_job(
    job: CleanupJob,
    store: MediaStore,
    settings: CleanupSettings,
    stats: Arc<CleanupStats>,
) {
    match job {
        CleanupJob::LocalFiles(paths) => {
            tokio::time::sleep(settings.initial_delay).await;
            for path in paths {
                match safe_unlink(&path, settings.retry).await {
                    Ok(UnlinkOutcome::Removed) | Ok(UnlinkOutcome::AlreadyGone) => {
                        stats.files_removed.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        stats.files_failed.fetch_add(1, Ordering::Relaxed);
                        tracing::error!(
                            path = %path.display(),
                            error = %e,
                            "Failed to remove staged file"
                        );
                    }
                }
            }
        }
        CleanupJob::RemoteAssets(references) => {
            for reference in references {
                if store.delete(&reference).await {
                    stats.assets_removed.fetch_add(1, Ordering::Relaxed);
                } else {
                    stats.assets_failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media_store::MediaFolders;
    use showroom_core::MediaKind;
    use showroom_processing::CompressionSettings;
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

    fn fast() -> CleanupSettings {
        CleanupSettings {
            initial_delay: Duration::from_millis(5),
            retry: RetryPolicy::new(2, Duration::from_millis(1)),
        }
    }

    #[tokio::test]
    async fn test_shutdown_drains_local_jobs() {
        let media = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..3)
            .map(|i| {
                let p = staging.path().join(format!("f{}.png", i));
                std::fs::write(&p, b"x").unwrap();
                p
            })
            .collect();

        let (queue, worker) = CleanupQueue::start(store(&media).await, fast());
        queue.remove_local(paths.clone());
        queue.remove_local(vec![staging.path().join("never-existed.png")]);
        worker.shutdown().await;

        assert!(paths.iter().all(|p| !p.exists()));
        let stats = queue.stats();
        assert_eq!(stats.files_removed, 4);
        assert_eq!(stats.files_failed, 0);
    }

    #[tokio::test]
    async fn test_remote_job_deletes_assets() {
        let media = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        let store = store(&media).await;
        let file = staging.path().join("doc.pdf");
        std::fs::write(&file, b"%PDF-1.4").unwrap();
        let uploaded = store.upload(&file, MediaKind::File).await.unwrap();

        let (queue, worker) = CleanupQueue::start(store, fast());
        queue.remove_remote(vec![
            uploaded,
            MediaReference::image("https://elsewhere.example/nothing"),
        ]);
        worker.shutdown().await;

        let stats = queue.stats();
        assert_eq!(stats.assets_removed, 1);
        assert_eq!(stats.assets_failed, 1);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_dropped() {
        let media = TempDir::new().unwrap();
        let (queue, worker) = CleanupQueue::start(store(&media).await, fast());
        worker.shutdown().await;
        queue.remove_local(vec![PathBuf::from("/tmp/whatever")]);
        assert_eq!(queue.stats(), CleanupSnapshot::default());
    }
}
