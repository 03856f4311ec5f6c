/// Errors that can occur while normalizing one study table.
///
/// Every variant is scoped to a single table: the combiner drops that study's
/// contribution for the category and carries on with the rest.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// A column holds a nested type (list, struct, map, union)
    #[error("Study '{study_id}': nested column '{column}' ({data_type}) cannot be normalized")]
    NestedColumn {
        /// Study the table belongs to
        study_id: String,
        /// Offending column
        column: String,
        /// Source data type
        data_type: String,
    },

    /// No cast exists from the source type to the canonical type
    #[error("Study '{study_id}': column '{column}' cannot be cast from {from} to {to}")]
    UnsupportedCast {
        /// Study the table belongs to
        study_id: String,
        /// Offending column
        column: String,
        /// Source data type
        from: String,
        /// Canonical data type
        to: String,
    },

    /// Error from the Arrow cast kernels
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Rebuilt table failed validation
    #[error(transparent)]
    StudyError(#[from] crate::study::StudyError),
}
