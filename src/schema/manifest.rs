//! Manifest written next to each processed study.
//!
//! The `study_manifest.json` file marks a study as successfully processed and
//! records which per-category tables the loader produced.

use serde::{Deserialize, Serialize};

use super::TableCategory;

/// One per-category table listed in a study manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestTable {
    /// Category of the table
    pub category: TableCategory,
    /// File name relative to the study directory
    pub file: String,
    /// Number of rows written
    pub rows: u64,
    /// Number of columns written
    pub columns: usize,
}

/// Manifest of a processed study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyManifest {
    /// Study identifier (`cancer_study_identifier`)
    pub study_id: String,
    /// Format version of the tables
    pub format_version: String,
    /// Tables produced for the study
    pub tables: Vec<ManifestTable>,
    /// RFC 3339 timestamp of when the study was processed
    pub created: String,
    /// Name and version of the tool that produced the tables
    pub loader: String,
}

impl StudyManifest {
    /// Creates an empty manifest stamped with the current time.
    pub fn new(study_id: impl Into<String>) -> Self {
        Self {
            study_id: study_id.into(),
            format_version: super::CBIOHUB_FORMAT_VERSION.to_string(),
            tables: Vec::new(),
            created: chrono::Utc::now().to_rfc3339(),
            loader: format!("cbiohub v{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Returns the manifest entry for a category, if that table was produced.
    pub fn table(&self, category: TableCategory) -> Option<&ManifestTable> {
        self.tables.iter().find(|t| t.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_serialization() {
        let mut manifest = StudyManifest::new("brca_tcga");
        manifest.tables.push(ManifestTable {
            category: TableCategory::ClinicalSample,
            file: TableCategory::ClinicalSample.study_file_name(),
            rows: 12,
            columns: 4,
        });

        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.contains("\"clinical-sample\""));

        let deserialized: StudyManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.study_id, "brca_tcga");
        assert_eq!(
            deserialized.table(TableCategory::ClinicalSample).map(|t| t.rows),
            Some(12)
        );
        assert!(deserialized.table(TableCategory::Mutations).is_none());
    }
}
