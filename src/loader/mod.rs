//! # Study Loader
//!
//! Converts raw study folders (tab-separated portal files) into the per-study Parquet
//! tables the combiner reads.
//!
//! ```text
//! <raw>/brca_tcga/                      <processed_root>/studies/brca_tcga/
//! ├── meta_study.txt                    ├── data_mutations.parquet
//! ├── data_clinical_patient.txt   ──►   ├── data_clinical_patient.parquet
//! ├── data_clinical_sample.txt          ├── data_clinical_sample.parquet
//! └── data_mutations.txt                └── study_manifest.json
//! ```

mod error;
mod study;
mod tsv;


use std::fmt;
use std::path::Path;

use log::warn;

use crate::config::StorePaths;
use crate::store::StoreWriterConfig;

pub use error::LoaderError;
pub use study::{find_study_folders, Study, META_STUDY_FILE, REQUIRED_FILES};
pub use tsv::{infer_type, read_tsv, read_tsv_file};

/// What happened to one study during ingestion
#[derive(Debug)]
pub enum IngestOutcome {
    /// Tables and manifest were written
    Processed,
    /// A manifest already existed
    AlreadyProcessed,
    /// Required files are missing
    MissingFiles(Vec<String>),
    /// Conversion failed
    Failed(LoaderError),
}

/// Tally of an ingestion run
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Newly processed studies
    pub processed: Vec<String>,
    /// Studies that were already processed
    pub already_processed: Vec<String>,
    /// Studies skipped because conversion failed
    pub skipped_errors: Vec<(String, String)>,
    /// Studies skipped because required files are missing
    pub skipped_missing: Vec<(String, Vec<String>)>,
}

impl IngestReport {
    /// Record the outcome for one study
    pub fn record(&mut self, study_id: &str, outcome: IngestOutcome) {
        let id = study_id.to_string();
        match outcome {
            IngestOutcome::Processed => self.processed.push(id),
            IngestOutcome::AlreadyProcessed => self.already_processed.push(id),
            IngestOutcome::MissingFiles(files) => self.skipped_missing.push((id, files)),
            IngestOutcome::Failed(e) => self.skipped_errors.push((id, e.to_string())),
        }
    }

    /// Total number of studies seen
    pub fn total(&self) -> usize {
        self.processed.len()
            + self.already_processed.len()
            + self.skipped_errors.len()
            + self.skipped_missing.len()
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processed: {}", self.processed.len())?;
        writeln!(f, "Already processed: {}", self.already_processed.len())?;
        writeln!(f, "Skipped (errors): {}", self.skipped_errors.len())?;
        for (id, error) in &self.skipped_errors {
            writeln!(f, "  - {}: {}", id, error)?;
        }
        write!(f, "Skipped (missing files): {}", self.skipped_missing.len())?;
        for (id, files) in &self.skipped_missing {
            write!(f, "\n  - {}: {}", id, files.join(", "))?;
        }
        Ok(())
    }
}

/// Ingests raw studies into a processed root.
#[derive(Debug, Clone)]
pub struct Loader {
    paths: StorePaths,
    config: StoreWriterConfig,
}

impl Loader {
    /// Loader writing into `paths` with default writer settings
    pub fn new(paths: &StorePaths) -> Self {
        Self {
            paths: paths.clone(),
            config: StoreWriterConfig::default(),
        }
    }

    /// Set the Parquet writer configuration
    pub fn with_writer_config(mut self, config: StoreWriterConfig) -> Self {
        self.config = config;
        self
    }

    /// Ingest one study, skipping it if already processed.
    pub fn ingest_study(&self, study: &Study) -> IngestOutcome {
        if study.is_processed(&self.paths) {
            return IngestOutcome::AlreadyProcessed;
        }
        let missing = study.missing_files();
        if !missing.is_empty() {
            warn!(
                "Skipping {}: missing {}",
                study.study_id(),
                missing.join(", ")
            );
            return IngestOutcome::MissingFiles(missing.into_iter().map(str::to_string).collect());
        }
        match study.create_parquets(&self.paths, &self.config) {
            Ok(_) => IngestOutcome::Processed,
            Err(e) => {
                warn!("Skipping {}: {}", study.study_id(), e);
                IngestOutcome::Failed(e)
            }
        }
    }

    /// Ingest every study found in `folder`.
    ///
    /// `on_study` is called with each study id before it is ingested.
    pub fn ingest<P, F>(&self, folder: P, mut on_study: F) -> Result<IngestReport, LoaderError>
    where
        P: AsRef<Path>,
        F: FnMut(&str),
    {
        let mut report = IngestReport::default();
        for path in find_study_folders(folder)? {
            let study = match Study::open(&path) {
                Ok(study) => study,
                Err(e) => {
                    let name = path.display().to_string();
                    on_study(&name);
                    report.record(&name, IngestOutcome::Failed(e));
                    continue;
                }
            };
            on_study(study.study_id());
            let outcome = self.ingest_study(&study);
            report.record(study.study_id(), outcome);
        }
        Ok(report)
    }
}
