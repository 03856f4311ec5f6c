use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::schema::{StudyManifest, TableCategory, STUDY_MANIFEST_FILE};
use crate::store::ReaderConfig;

use super::{StudyError, StudyTable};

/// A study directory under `<processed_root>/studies/`.
#[derive(Debug, Clone)]
pub struct ProcessedStudy {
    study_id: String,
    dir: PathBuf,
    manifest: Option<StudyManifest>,
}

impl ProcessedStudy {
    /// Open a study directory, reading its manifest when present.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StudyError> {
        let dir = dir.as_ref().to_path_buf();
        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let manifest_path = dir.join(STUDY_MANIFEST_FILE);
        let manifest = if manifest_path.is_file() {
            let manifest = read_manifest(&manifest_path).map_err(|e| StudyError::ManifestError {
                study_id: dir_name.clone(),
                path: manifest_path.clone(),
                source: Box::new(e),
            })?;
            Some(manifest)
        } else {
            None
        };

        let study_id = match &manifest {
            Some(m) => m.study_id.clone(),
            None => dir_name,
        };

        Ok(Self {
            study_id,
            dir,
            manifest,
        })
    }

    /// Study identifier
    pub fn study_id(&self) -> &str {
        &self.study_id
    }

    /// Directory holding the study's tables
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Manifest written by the loader, if any
    pub fn manifest(&self) -> Option<&StudyManifest> {
        self.manifest.as_ref()
    }

    /// A study counts as processed once the loader wrote its manifest.
    pub fn is_processed(&self) -> bool {
        self.manifest.is_some()
    }

    /// Path of the per-category table
    pub fn table_path(&self, category: TableCategory) -> PathBuf {
        self.dir.join(category.study_file_name())
    }

    /// Load the per-category table, or `None` if the study has no such table.
    pub fn load_table(
        &self,
        category: TableCategory,
        config: &ReaderConfig,
    ) -> Result<Option<StudyTable>, StudyError> {
        let path = self.table_path(category);
        if !path.is_file() {
            return Ok(None);
        }
        let table = StudyTable::read_parquet(&path, &self.study_id, category, config)?;
        debug!(
            "Loaded {} table of {} ({} rows, {} columns)",
            category,
            self.study_id,
            table.num_rows(),
            table.schema().fields().len()
        );
        Ok(Some(table))
    }
}

fn read_manifest(path: &Path) -> Result<StudyManifest, StudyError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Open every study directory under `studies_dir`, sorted by directory name.
///
/// Each study is opened independently, so one unreadable manifest only fails its
/// own entry. A missing `studies_dir` yields an empty list; failing to list the
/// directory is an error.
pub fn discover_studies<P: AsRef<Path>>(
    studies_dir: P,
) -> Result<Vec<Result<ProcessedStudy, StudyError>>, StudyError> {
    let studies_dir = studies_dir.as_ref();
    if !studies_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(studies_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();

    Ok(dirs.into_iter().map(ProcessedStudy::open).collect())
}
