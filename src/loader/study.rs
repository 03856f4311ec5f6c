use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use log::{debug, info};

use crate::config::StorePaths;
use crate::schema::{
    columns, ManifestTable, StudyManifest, TableCategory, CBIOHUB_FORMAT_VERSION,
    KEY_CATEGORY, KEY_FORMAT_VERSION, STUDY_MANIFEST_FILE,
};
use crate::store::{write_table_atomic, StoreWriterConfig};

use super::tsv::read_tsv_file;
use super::LoaderError;

/// Study metadata file marking a folder as a study
pub const META_STUDY_FILE: &str = "meta_study.txt";

/// Key of the study identifier inside `meta_study.txt`
const STUDY_ID_KEY: &str = "cancer_study_identifier";

/// Files every study must provide
pub const REQUIRED_FILES: [&str; 3] = [
    META_STUDY_FILE,
    "data_clinical_sample.txt",
    "data_clinical_patient.txt",
];

/// A raw study folder in the portal's tab-separated layout.
#[derive(Debug, Clone)]
pub struct Study {
    folder: PathBuf,
    study_id: String,
}

impl Study {
    /// Check whether `folder` holds a study
    pub fn is_study<P: AsRef<Path>>(folder: P) -> bool {
        folder.as_ref().join(META_STUDY_FILE).is_file()
    }

    /// Open a study folder, reading its identifier from `meta_study.txt`.
    ///
    /// Falls back to the folder name when the identifier line is absent.
    pub fn open<P: AsRef<Path>>(folder: P) -> Result<Self, LoaderError> {
        let folder = folder.as_ref().to_path_buf();
        if !Self::is_study(&folder) {
            return Err(LoaderError::NotAStudy(folder));
        }

        let meta = fs::read_to_string(folder.join(META_STUDY_FILE))?;
        let study_id = parse_study_id(&meta).unwrap_or_else(|| {
            folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        Ok(Self { folder, study_id })
    }

    /// Study identifier
    pub fn study_id(&self) -> &str {
        &self.study_id
    }

    /// Raw study folder
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Required files the folder lacks
    pub fn missing_files(&self) -> Vec<&'static str> {
        REQUIRED_FILES
            .into_iter()
            .filter(|f| !self.folder.join(f).is_file())
            .collect()
    }

    /// Check that every required file is present
    pub fn check_integrity(&self) -> bool {
        self.missing_files().is_empty()
    }

    /// First raw file present for a category
    pub fn raw_file(&self, category: TableCategory) -> Option<PathBuf> {
        category
            .raw_file_names()
            .iter()
            .map(|name| self.folder.join(name))
            .find(|path| path.is_file())
    }

    /// Output directory of this study under `paths`
    pub fn processed_dir(&self, paths: &StorePaths) -> PathBuf {
        paths.study_dir(&self.study_id)
    }

    /// A study is processed once its manifest exists
    pub fn is_processed(&self, paths: &StorePaths) -> bool {
        self.processed_dir(paths).join(STUDY_MANIFEST_FILE).is_file()
    }

    /// Convert every available table to Parquet and write the manifest.
    ///
    /// Each table gets a `study_id` column. The manifest is written last, so an
    /// interrupted run leaves the study unprocessed.
    pub fn create_parquets(
        &self,
        paths: &StorePaths,
        config: &StoreWriterConfig,
    ) -> Result<StudyManifest, LoaderError> {
        let missing = self.missing_files();
        if !missing.is_empty() {
            return Err(LoaderError::MissingFiles {
                study_id: self.study_id.clone(),
                files: missing.into_iter().map(str::to_string).collect(),
            });
        }

        let out_dir = self.processed_dir(paths);
        fs::create_dir_all(&out_dir)?;
        let mut manifest = StudyManifest::new(&self.study_id);

        for category in TableCategory::ALL {
            let Some(raw) = self.raw_file(category) else {
                debug!("{} has no {} file", self.study_id, category);
                continue;
            };
            let batch = with_study_id(read_tsv_file(&raw)?, &self.study_id)?;

            let mut metadata = HashMap::new();
            metadata.insert(
                KEY_FORMAT_VERSION.to_string(),
                CBIOHUB_FORMAT_VERSION.to_string(),
            );
            metadata.insert(KEY_CATEGORY.to_string(), category.to_string());

            let file = category.study_file_name();
            let stats = write_table_atomic(
                &out_dir.join(&file),
                batch.schema(),
                std::slice::from_ref(&batch),
                config,
                &metadata,
            )?;
            debug!("{} {}: {}", self.study_id, category, stats);

            manifest.tables.push(ManifestTable {
                category,
                file,
                rows: stats.rows_written as u64,
                columns: batch.num_columns(),
            });
        }

        let manifest_path = out_dir.join(STUDY_MANIFEST_FILE);
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
        info!(
            "Processed {} ({} tables) into {}",
            self.study_id,
            manifest.tables.len(),
            out_dir.display()
        );
        Ok(manifest)
    }
}

fn parse_study_id(meta: &str) -> Option<String> {
    meta.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == STUDY_ID_KEY)
            .then(|| value.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// Set the `study_id` column to `study_id` on every row.
fn with_study_id(batch: RecordBatch, study_id: &str) -> Result<RecordBatch, LoaderError> {
    let rows = batch.num_rows();
    let ids: ArrayRef = Arc::new(StringArray::from(vec![study_id; rows]));
    let field = Arc::new(Field::new(columns::STUDY_ID, DataType::Utf8, true));

    let schema = batch.schema();
    let mut fields: Vec<_> = schema.fields().iter().cloned().collect();
    let mut arrays = batch.columns().to_vec();
    match schema.index_of(columns::STUDY_ID) {
        Ok(idx) => {
            fields[idx] = field;
            arrays[idx] = ids;
        }
        Err(_) => {
            fields.push(field);
            arrays.push(ids);
        }
    }

    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &options,
    )?)
}

/// Studies inside `folder`: its study sub-folders, or the folder itself.
///
/// Sub-folders are returned sorted by path.
pub fn find_study_folders<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>, LoaderError> {
    let folder = folder.as_ref();
    let mut found = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_dir() && Study::is_study(&path) {
            found.push(path);
        }
    }
    found.sort();

    if found.is_empty() && Study::is_study(folder) {
        found.push(folder.to_path_buf());
    }
    Ok(found)
}
