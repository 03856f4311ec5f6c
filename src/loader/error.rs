use std::path::PathBuf;

use crate::store::StoreError;

/// Errors that can occur while ingesting a raw study folder
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TSV parsing error
    #[error("TSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Arrow error building a table
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error writing a per-study table
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// Manifest serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Folder has no `meta_study.txt`
    #[error("Not a study folder: {}", .0.display())]
    NotAStudy(PathBuf),

    /// Required study files are missing
    #[error("Study '{study_id}' is missing required files: {}", .files.join(", "))]
    MissingFiles {
        /// Study identifier
        study_id: String,
        /// Missing file names
        files: Vec<String>,
    },

    /// Table has no header line
    #[error("Empty table: {}", .0.display())]
    EmptyTable(PathBuf),
}
