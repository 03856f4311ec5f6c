use std::path::PathBuf;

use crate::schema::SchemaValidationError;

/// Errors raised while reading or writing combined store tables
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Combined table does not exist
    #[error("Combined table not found: {}", .0.display())]
    MissingTable(PathBuf),

    /// Column not found in a combined table
    #[error("Column '{column}' not found in {}", .path.display())]
    ColumnNotFound {
        /// Requested column
        column: String,
        /// Table that was scanned
        path: PathBuf,
    },

    /// Table schema cannot serve queries
    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] SchemaValidationError),

    /// Another combine run holds the store
    #[error("Combined store is locked by another run: {}", .0.display())]
    Locked(PathBuf),
}
