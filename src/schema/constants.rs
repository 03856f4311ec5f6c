/// Combined store format version - follows semantic versioning
pub const CBIOHUB_FORMAT_VERSION: &str = "1.0.0";

/// File extension for every table written by this crate
pub const PARQUET_EXTENSION: &str = "parquet";

/// Name of the per-study manifest written by the study loader
pub const STUDY_MANIFEST_FILE: &str = "study_manifest.json";

/// Sub-directory of the processed root holding per-study tables
pub const STUDIES_DIR: &str = "studies";

/// Sub-directory of the processed root holding the combined store
pub const COMBINED_DIR: &str = "combined";

/// Metadata key for format version in Parquet footer
pub const KEY_FORMAT_VERSION: &str = "cbiohub:format_version";

/// Metadata key for the table category in Parquet footer
pub const KEY_CATEGORY: &str = "cbiohub:category";

/// Metadata key for the JSON list of contributing study ids
pub const KEY_STUDIES: &str = "cbiohub:studies";

/// Metadata key for the creation timestamp (RFC 3339)
pub const KEY_CREATED_AT: &str = "cbiohub:created_at";
