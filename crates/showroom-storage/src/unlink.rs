//! Retrying removal of local files
//!
//! Staged uploads may still be held open briefly by the multipart reader or an
//! antivirus scanner, so removal retries transient failures with exponential
//! backoff. A file that is already gone counts as removed.

use std::io::{self, ErrorKind};
use std::path::Path;
use std::time::Duration;

#[cfg(unix)]
const TOO_MANY_OPEN_FILES: &[i32] = &[23, 24]; // ENFILE, EMFILE
#[cfg(windows)]
const TOO_MANY_OPEN_FILES: &[i32] = &[4, 32]; // ERROR_TOO_MANY_OPEN_FILES, ERROR_SHARING_VIOLATION
#[cfg(not(any(unix, windows)))]
const TOO_MANY_OPEN_FILES: &[i32] = &[];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(200))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlinkOutcome {
    Removed,
    AlreadyGone,
}

fn is_transient(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::PermissionDenied | ErrorKind::ResourceBusy)
        || err
            .raw_os_error()
            .is_some_and(|code| TOO_MANY_OPEN_FILES.contains(&code))
}

/// Remove `path`, retrying transient failures according to `policy`.
///
/// Returns the last error once retries are exhausted or on a non-transient failure.
pub async fn safe_unlink(path: &Path, policy: RetryPolicy) -> io::Result<UnlinkOutcome> {
    let mut attempt = 0;
    loop {
        match tokio::fs::remove_file(path).await {
            Ok(()) => return Ok(UnlinkOutcome::Removed),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(UnlinkOutcome::AlreadyGone),
            Err(e) if is_transient(&e) && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                tracing::debug!(
                    path = %path.display(),
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "File busy, retrying removal"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
