use crate::store::StoreError;
use crate::study::StudyError;

/// Errors that fail a whole category (or, for store/discovery errors, the run)
#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    /// Same-named columns whose types have no common supertype
    #[error("Cannot promote column '{column}': {left} and {right} are incompatible")]
    SchemaPromotion {
        /// Column name
        column: String,
        /// Type seen first
        left: String,
        /// Conflicting type
        right: String,
    },

    /// Error reading the studies directory
    #[error("Study error: {0}")]
    StudyError(#[from] StudyError),

    /// Error writing the combined table or taking the store lock
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// Error from the Arrow cast/concat kernels
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error serializing footer metadata
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
