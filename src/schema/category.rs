use std::fmt;
use std::str::FromStr;

use arrow::datatypes::SchemaRef;
use serde::{Deserialize, Serialize};

use super::builders::create_mutation_schema_arc;

/// The three table categories every study contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableCategory {
    /// One row per mutation call (MAF-like)
    Mutations,
    /// One row per patient
    ClinicalPatient,
    /// One row per sample
    ClinicalSample,
}

/// Target schema a category is normalized against.
#[derive(Debug, Clone)]
pub enum CanonicalSchema {
    /// Fixed, ordered column set; columns outside it are dropped
    Fixed(SchemaRef),
    /// Any column set is accepted as-is
    Open,
}

impl TableCategory {
    /// All categories, in combine order.
    pub const ALL: [TableCategory; 3] = [
        TableCategory::Mutations,
        TableCategory::ClinicalPatient,
        TableCategory::ClinicalSample,
    ];

    /// Short stem shared by the per-study and combined file names.
    pub fn stem(&self) -> &'static str {
        match self {
            TableCategory::Mutations => "mutations",
            TableCategory::ClinicalPatient => "clinical_patient",
            TableCategory::ClinicalSample => "clinical_sample",
        }
    }

    /// File name of the per-study table, e.g. `data_mutations.parquet`.
    pub fn study_file_name(&self) -> String {
        format!("data_{}.{}", self.stem(), super::PARQUET_EXTENSION)
    }

    /// File name of the combined table, e.g. `combined_mutations.parquet`.
    pub fn combined_file_name(&self) -> String {
        format!("combined_{}.{}", self.stem(), super::PARQUET_EXTENSION)
    }

    /// Raw tab-separated source files, in order of preference.
    pub fn raw_file_names(&self) -> &'static [&'static str] {
        match self {
            TableCategory::Mutations => &["data_mutations.txt", "data_mutations_extended.txt"],
            TableCategory::ClinicalPatient => &["data_clinical_patient.txt"],
            TableCategory::ClinicalSample => &["data_clinical_sample.txt"],
        }
    }

    /// Canonical schema used by the normalizer for this category.
    pub fn canonical_schema(&self) -> CanonicalSchema {
        match self {
            TableCategory::Mutations => CanonicalSchema::Fixed(create_mutation_schema_arc()),
            TableCategory::ClinicalPatient | TableCategory::ClinicalSample => CanonicalSchema::Open,
        }
    }
}

impl fmt::Display for TableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableCategory::Mutations => write!(f, "mutations"),
            TableCategory::ClinicalPatient => write!(f, "clinical-patient"),
            TableCategory::ClinicalSample => write!(f, "clinical-sample"),
        }
    }
}

impl FromStr for TableCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "mutations" => Ok(TableCategory::Mutations),
            "clinical-patient" => Ok(TableCategory::ClinicalPatient),
            "clinical-sample" => Ok(TableCategory::ClinicalSample),
            _ => Err(format!(
                "Unknown table category '{}'. Valid options: mutations, clinical-patient, clinical-sample",
                s
            )),
        }
    }
}
