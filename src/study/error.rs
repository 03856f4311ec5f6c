/// Errors that can occur while reading per-study tables
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Manifest parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Record batches disagree with the table schema
    #[error("Schema mismatch in study '{study_id}': {message}")]
    SchemaMismatch {
        /// Study the table belongs to
        study_id: String,
        /// What did not match
        message: String,
    },

    /// The study's manifest exists but could not be read or parsed
    #[error("Unreadable manifest for study '{study_id}' ({}): {source}", .path.display())]
    ManifestError {
        /// Study the manifest belongs to (its directory name)
        study_id: String,
        /// Path of the manifest
        path: std::path::PathBuf,
        /// Underlying read or parse failure
        #[source]
        source: Box<StudyError>,
    },
}

impl StudyError {
    /// Study the error is about, when known
    pub fn study_id(&self) -> Option<&str> {
        match self {
            StudyError::SchemaMismatch { study_id, .. } | StudyError::ManifestError { study_id, .. } => {
                Some(study_id)
            }
            _ => None,
        }
    }
}
