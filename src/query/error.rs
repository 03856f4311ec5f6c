use std::path::PathBuf;

use crate::schema::SchemaValidationError;
use crate::store::StoreError;

/// Errors returned by the query operations.
///
/// Argument errors are raised before any file is opened; everything else is an
/// execution failure. No query ever returns a partial result.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Incomplete, ambiguous or empty query arguments
    #[error("Invalid arguments: {0}")]
    InvalidArgument(String),

    /// Clinical attribute is not a column of the clinical sample table
    #[error("Unknown clinical attribute '{attribute}' in {}", .path.display())]
    UnknownAttribute {
        /// Requested attribute
        attribute: String,
        /// Clinical sample table
        path: PathBuf,
    },

    /// Combined table has not been built
    #[error("Combined table not found: {} (run `cbiohub combine` first)", .0.display())]
    MissingStore(PathBuf),

    /// A column the query needs is missing
    #[error("Column '{column}' not found in {}", .path.display())]
    ColumnNotFound {
        /// Missing column
        column: String,
        /// Table that was scanned
        path: PathBuf,
    },

    /// Combined table cannot serve queries
    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] SchemaValidationError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingTable(path) => QueryError::MissingStore(path),
            StoreError::ColumnNotFound { column, path } => QueryError::ColumnNotFound { column, path },
            StoreError::InvalidSchema(e) => QueryError::InvalidSchema(e),
            // Queries never take the combine lock
            StoreError::Locked(path) => QueryError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("combined store is locked: {}", path.display()),
            )),
            StoreError::IoError(e) => QueryError::IoError(e),
            StoreError::ArrowError(e) => QueryError::ArrowError(e),
            StoreError::ParquetError(e) => QueryError::ParquetError(e),
        }
    }
}
