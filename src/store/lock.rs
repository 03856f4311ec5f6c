use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::StoreError;

/// Lock file name inside a combined store directory
pub const LOCK_FILE: &str = ".combine.lock";

/// Who, if anyone, holds the lock on a combined store directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No lock file
    Free,
    /// A running process holds the lock
    HeldBy(u32),
    /// The lock file names a process that is no longer running
    Stale(u32),
    /// A lock file exists but its holder cannot be determined
    Unknown,
}

/// Exclusive ownership of a combined store directory for one combine run.
///
/// Acquiring fails fast when a running process holds the lock. A lock left behind
/// by a process that no longer exists is removed and acquisition retried once. The
/// lock file is removed when the guard drops.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    /// Take the lock on `dir`, creating the directory if needed.
    pub fn acquire(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOCK_FILE);

        match try_create(&path)? {
            Some(lock) => Ok(lock),
            None => match Self::state(dir) {
                LockState::Stale(pid) => {
                    info!(
                        "Removing stale lock {} left by pid {}",
                        path.display(),
                        pid
                    );
                    match fs::remove_file(&path) {
                        Ok(()) => {}
                        Err(e) if e.kind() == ErrorKind::NotFound => {}
                        Err(e) => return Err(e.into()),
                    }
                    try_create(&path)?.ok_or(StoreError::Locked(path))
                }
                _ => Err(StoreError::Locked(path)),
            },
        }
    }

    /// Inspect the lock on `dir` without taking it.
    pub fn state(dir: &Path) -> LockState {
        let path = dir.join(LOCK_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return LockState::Free,
            Err(_) => return LockState::Unknown,
        };
        match content.trim().parse::<u32>() {
            Ok(pid) if is_process_running(pid) => LockState::HeldBy(pid),
            Ok(pid) => LockState::Stale(pid),
            Err(_) => LockState::Unknown,
        }
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Create the lock file, or `None` if it already exists.
fn try_create(path: &Path) -> Result<Option<StoreLock>, StoreError> {
    match OpenOptions::new().create_new(true).write(true).open(path) {
        Ok(mut file) => {
            writeln!(file, "{}", std::process::id())?;
            Ok(Some(StoreLock {
                path: path.to_path_buf(),
            }))
        }
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    if pid == std::process::id() {
        return true;
    }
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

// Without a portable liveness check every recorded holder counts as running
#[cfg(not(unix))]
fn is_process_running(_pid: u32) -> bool {
    true
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}
