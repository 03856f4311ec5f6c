use anyhow::{bail, Context, Result};
use std::fs;

use cbiohub::config::StorePaths;
use cbiohub::store::{LockState, StoreLock};

/// Remove everything under the processed root
pub fn run(paths: &StorePaths) -> Result<()> {
    let root = paths.processed_root();
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    match StoreLock::state(&paths.combined_dir()) {
        LockState::Free | LockState::Stale(_) => {}
        LockState::HeldBy(pid) => bail!(
            "A combine run (pid {}) holds {}; refusing to clean",
            pid,
            paths.combined_dir().display()
        ),
        LockState::Unknown => bail!(
            "{} is locked by an unknown holder; refusing to clean",
            paths.combined_dir().display()
        ),
    }

    for entry in fs::read_dir(root).with_context(|| format!("Failed to list {}", root.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        }
        .with_context(|| format!("Failed to remove {}", path.display()))?;
    }

    println!("Cleaned all files and directories in {}.", root.display());
    Ok(())
}
