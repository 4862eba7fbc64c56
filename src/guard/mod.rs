// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Concurrency guard for device access.
//!
//! The Juno's control daemon handles exactly one session at a time, so every
//! device operation (poll or action) must be the only one talking to the
//! device, across threads and across cooperating processes. The arbitration
//! primitive is an advisory exclusive lock (`flock`) on a well-known file
//! path: the kernel releases it when the holder exits, so a crash while the
//! lock is held cannot leave a stale lock behind.
//!
//! A caller that cannot acquire the lock within the configured timeout skips
//! its operation with a warning instead of raising an error. Callers that had
//! to wait also pause briefly after acquiring, because the control daemon is
//! fragile under rapid sequential connections.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default lock file path shared by cooperating processes.
pub const DEFAULT_LOCK_PATH: &str = "/var/lock/atlonajuno";

/// Default maximum wait for the lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(120);

/// Interval between lock attempts.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Pause after acquiring a contended lock, before touching the device.
const SETTLE_DELAY: Duration = Duration::from_secs(5);

/// File-lock based mutual exclusion for device operations.
///
/// # Examples
///
/// ```no_run
/// use juno_lib::guard::DeviceLock;
///
/// # async fn example() {
/// let lock = DeviceLock::new("/var/lock/atlonajuno");
///
/// // Runs the operation only if the lock is acquired within the timeout;
/// // returns None if the operation was skipped.
/// let ran = lock.run(async { /* talk to the device */ }).await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeviceLock {
    path: PathBuf,
    timeout: Duration,
    poll_interval: Duration,
    settle_delay: Duration,
}

impl DeviceLock {
    /// Creates a guard for the given lock file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: DEFAULT_LOCK_TIMEOUT,
            poll_interval: POLL_INTERVAL,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Sets the maximum time to wait for the lock.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the interval between lock attempts.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the settle delay inserted after a contended acquisition.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Returns the lock file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `op` while holding the device lock.
    ///
    /// Polls for the lock once per [`poll_interval`](Self::with_poll_interval)
    /// up to the timeout. If this caller had to wait, a settle delay is
    /// inserted before `op` runs. The lock is released when the returned
    /// future completes, whether or not `op` succeeded.
    ///
    /// Returns `None` if the lock could not be acquired in time (the
    /// operation is skipped, logged at warn level) or if the lock file could
    /// not be opened.
    pub async fn run<T>(&self, op: impl Future<Output = T>) -> Option<T> {
        let deadline = Instant::now() + self.timeout;
        let mut waited = false;

        let lock = loop {
            match self.try_acquire() {
                Ok(Some(lock)) => break lock,
                Ok(None) => {}
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err,
                        "cannot open device lock file; skipping operation");
                    return None;
                }
            }

            if Instant::now() >= deadline {
                warn!(path = %self.path.display(), timeout = ?self.timeout,
                    "device lock not acquired within timeout; skipping operation");
                return None;
            }

            waited = true;
            tokio::time::sleep(self.poll_interval).await;
        };

        if waited {
            debug!(path = %self.path.display(), delay = ?self.settle_delay,
                "lock was contended; settling before device access");
            tokio::time::sleep(self.settle_delay).await;
        }

        let result = op.await;
        drop(lock);
        Some(result)
    }

    /// One non-blocking lock attempt.
    ///
    /// `Ok(None)` means another holder has the lock; `Err` means the lock
    /// file itself could not be opened or locked.
    fn try_acquire(&self) -> io::Result<Option<Flock<File>>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => Ok(Some(lock)),
            Err((_, Errno::EAGAIN)) => Ok(None),
            Err((_, errno)) => Err(io::Error::from(errno)),
        }
    }
}
