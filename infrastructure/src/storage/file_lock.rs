//! Advisory cross-process lock on a sibling `.lock` file.
//!
//! Several processes (e.g. concurrent CLI invocations) may share one
//! session record. The lock file is never deleted: removing it while
//! another process waits on the old inode would let two writers in.

use fs2::FileExt;
use shortlist_application::StoreError;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::trace;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Exclusive lock guard, released on drop
pub(crate) struct FileLock {
    file: File,
}

impl FileLock {
    /// Poll for the exclusive lock until `deadline`
    ///
    /// `timeout` is only used to describe the failure.
    pub(crate) async fn acquire(
        lock_path: &Path,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("creating {}: {}", parent.display(), e))
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|e| {
                StoreError::Unavailable(format!("opening lock {}: {}", lock_path.display(), e))
            })?;

        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => return Ok(Self { file }),
                Err(e) if is_contended(&e) => {
                    if Instant::now() >= deadline {
                        return Err(StoreError::LockTimeout(timeout));
                    }
                    trace!("Session lock {} is busy, retrying", lock_path.display());
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(e) => {
                    return Err(StoreError::Unavailable(format!(
                        "locking {}: {}",
                        lock_path.display(),
                        e
                    )));
                }
            }
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn is_contended(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::WouldBlock
        || error.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
