//! Single-writer flushing of one backing file.
//!
//! A flush requested while another is in flight does not queue behind it: it
//! marks the file dirty and returns, and the running writer takes one more
//! snapshot before releasing the lock. At most one extra write is ever
//! pending, and the last snapshot taken wins.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use crate::error::RepoError;

pub struct CoalescingWriter {
    path: PathBuf,
    lock: Mutex<()>,
    pending: AtomicBool,
}

impl CoalescingWriter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
            pending: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the bytes produced by `snapshot` to the backing file.
    ///
    /// `snapshot` is called once per write, after the lock is held, so the
    /// write always reflects the state at that moment rather than the state
    /// when the flush was requested.
    pub async fn flush<F, Fut>(&self, snapshot: F) -> Result<(), RepoError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, RepoError>>,
    {
        self.pending.store(true, Ordering::Release);

        loop {
            let Ok(guard) = self.lock.try_lock() else {
                tracing::debug!(path = %self.path.display(), "Write in flight, deferring");
                return Ok(());
            };

            while self.pending.swap(false, Ordering::AcqRel) {
                let bytes = snapshot().await?;
                write_atomically(&self.path, &bytes).await?;
            }

            drop(guard);

            // A flush may have been requested between the last swap and the
            // unlock; its caller saw the lock held and left it to us.
            if !self.pending.load(Ordering::Acquire) {
                return Ok(());
            }
        }
    }
}

/// Write to a sibling temp file, then rename over the target.
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), RepoError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
