//! Explicit path configuration shared by the loader, the combiner and the queries.
//!
//! A single [`StorePaths`] value is built once (usually by the CLI) and handed to every
//! component; nothing in the library reads process-wide settings.

use std::path::{Path, PathBuf};

use crate::schema::{TableCategory, COMBINED_DIR, STUDIES_DIR};

/// Default processed root, relative to the user's home directory
pub const DEFAULT_PROCESSED_DIR: &str = "cbiohub";

/// Environment variable overriding the processed root
pub const PROCESSED_PATH_ENV: &str = "CBIOHUB_PROCESSED_PATH";

/// Layout of the processed data directory.
///
/// ```text
/// <processed_root>/
/// ├── studies/<study_id>/data_{mutations,clinical_patient,clinical_sample}.parquet
/// └── combined/combined_{mutations,clinical_patient,clinical_sample}.parquet
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    processed_root: PathBuf,
}

impl StorePaths {
    /// Create a layout rooted at `processed_root` (`~` is expanded).
    pub fn new<P: AsRef<Path>>(processed_root: P) -> Self {
        Self {
            processed_root: expand_home(processed_root.as_ref()),
        }
    }

    /// Root directory holding `studies/` and `combined/`
    pub fn processed_root(&self) -> &Path {
        &self.processed_root
    }

    /// Directory holding one sub-directory per processed study
    pub fn studies_dir(&self) -> PathBuf {
        self.processed_root.join(STUDIES_DIR)
    }

    /// Directory holding the tables of one processed study
    pub fn study_dir(&self, study_id: &str) -> PathBuf {
        self.studies_dir().join(study_id)
    }

    /// Canonical directory of the combined store
    pub fn combined_dir(&self) -> PathBuf {
        self.processed_root.join(COMBINED_DIR)
    }

    /// Combined table path for a category inside `dir`
    pub fn combined_file_in(dir: &Path, category: TableCategory) -> PathBuf {
        dir.join(category.combined_file_name())
    }

    /// Combined table path for a category in the canonical combined directory
    pub fn combined_file(&self, category: TableCategory) -> PathBuf {
        Self::combined_file_in(&self.combined_dir(), category)
    }
}

impl Default for StorePaths {
    fn default() -> Self {
        let root = dirs::home_dir()
            .map(|home| home.join(DEFAULT_PROCESSED_DIR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROCESSED_DIR));
        Self {
            processed_root: root,
        }
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
